//! Pixel buffers: a premultiplied-alpha RGBA layer and the final encodable
//! frame. Compositing is done in premultiplied space so `over` and `multiply`
//! blends don't need to special-case transparent pixels.

use image::{ImageBuffer, Rgba};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O error writing PNG to '{0}': {1}")]
	Io(String, std::io::Error),
	#[error("PNG encoding error: {0}")]
	Encode(#[from] image::ImageError),
}

/// RGBA, premultiplied, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pixel {
	pub r: f32,
	pub g: f32,
	pub b: f32,
	pub a: f32,
}

impl Pixel {
	pub const TRANSPARENT: Pixel = Pixel { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

	pub fn opaque(r: f32, g: f32, b: f32) -> Self {
		Pixel { r, g, b, a: 1.0 }
	}

	pub fn with_alpha(r: f32, g: f32, b: f32, a: f32) -> Self {
		Pixel { r: r * a, g: g * a, b: b * a, a }
	}

	/// Porter-Duff "over": `self` is drawn on top of `dst`.
	pub fn over(self, dst: Pixel) -> Pixel {
		let inv = 1.0 - self.a;
		Pixel { r: self.r + dst.r * inv, g: self.g + dst.g * inv, b: self.b + dst.b * inv, a: self.a + dst.a * inv }
	}

	pub fn lerp(self, other: Pixel, t: f32) -> Pixel {
		Pixel {
			r: self.r + (other.r - self.r) * t,
			g: self.g + (other.g - self.g) * t,
			b: self.b + (other.b - self.b) * t,
			a: self.a + (other.a - self.a) * t,
		}
	}
}

#[derive(Debug, Clone)]
pub struct Layer {
	pub width: u32,
	pub height: u32,
	pub pixels: Vec<Pixel>,
}

impl Layer {
	pub fn new(width: u32, height: u32) -> Self {
		Layer { width, height, pixels: vec![Pixel::TRANSPARENT; (width as usize) * (height as usize)] }
	}

	pub fn get(&self, x: u32, y: u32) -> Pixel {
		self.pixels[(y as usize) * (self.width as usize) + (x as usize)]
	}

	pub fn set(&mut self, x: u32, y: u32, p: Pixel) {
		let idx = (y as usize) * (self.width as usize) + (x as usize);
		self.pixels[idx] = p;
	}

	pub fn in_bounds(&self, x: i64, y: i64) -> bool {
		x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
	}

	/// Composites `top` over `self` in place (Porter-Duff "over").
	pub fn blend_over(&mut self, top: &Layer) {
		for (dst, &src) in self.pixels.iter_mut().zip(&top.pixels) {
			*dst = src.over(*dst);
		}
	}

	/// Multiplies `self` by `other`'s RGB channels, e.g. to darken a
	/// background layer with a hillshade field. Where `other` is transparent
	/// the multiplier is 1.0 (no darkening), blended in by `other`'s alpha.
	pub fn multiply(&mut self, other: &Layer) {
		for (dst, &src) in self.pixels.iter_mut().zip(&other.pixels) {
			let unmultiply = |c: f32| if src.a > 0.0001 { c / src.a } else { 1.0 };
			let mr = 1.0 + (unmultiply(src.r) - 1.0) * src.a;
			let mg = 1.0 + (unmultiply(src.g) - 1.0) * src.a;
			let mb = 1.0 + (unmultiply(src.b) - 1.0) * src.a;
			dst.r *= mr;
			dst.g *= mg;
			dst.b *= mb;
		}
	}

	fn to_image_buffer(&self) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
		let mut img = ImageBuffer::new(self.width, self.height);
		for (x, y, out) in img.enumerate_pixels_mut() {
			let p = self.get(x, y);
			let a = p.a.clamp(0.0, 1.0);
			let unmultiply = |c: f32| if a > 0.0001 { (c / a).clamp(0.0, 1.0) } else { 0.0 };
			*out = Rgba([
				(unmultiply(p.r) * 255.0).round() as u8,
				(unmultiply(p.g) * 255.0).round() as u8,
				(unmultiply(p.b) * 255.0).round() as u8,
				(a * 255.0).round() as u8,
			]);
		}
		img
	}

	pub fn encode_png(&self, path: &Path) -> Result<(), Error> {
		self.to_image_buffer().save(path).map_err(|e| match e {
			image::ImageError::IoError(io) => Error::Io(path.display().to_string(), io),
			other => Error::Encode(other),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opaque_over_transparent_is_itself() {
		let top = Pixel::opaque(1.0, 0.0, 0.0);
		let bottom = Pixel::TRANSPARENT;
		let result = top.over(bottom);
		assert_eq!(result, top);
	}

	#[test]
	fn new_layer_is_fully_transparent() {
		let layer = Layer::new(4, 4);
		assert!(layer.pixels.iter().all(|p| p.a == 0.0));
	}
}
