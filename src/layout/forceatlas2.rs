//! The ForceAtlas2 force-directed layout (Jacomy et al.), run as three
//! successive passes of increasing precision over a single snapshot.
//!
//! Repulsion between every pair of nodes is approximated with a Barnes-Hut
//! quadtree when a pass enables it; attraction runs once per edge; gravity
//! pulls every node back towards the origin so disconnected components don't
//! drift off to infinity. The per-iteration step size is derived from the
//! classic "swinging vs. traction" auto-speed heuristic, then divided by the
//! pass's `slow_down` factor.

use super::barnes_hut::BarnesHutTree;
use super::seeding::{get_position, set_position};
use crate::slicer::Snapshot;
use rayon::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct Fa2Settings {
	pub lin_log: bool,
	pub strong_gravity: bool,
	pub gravity: f64,
	pub scaling: f64,
}

impl Default for Fa2Settings {
	fn default() -> Self {
		Fa2Settings { lin_log: true, strong_gravity: true, gravity: 0.01, scaling: 1.0 }
	}
}

/// One of the three ForceAtlas2 passes run over a snapshot, each tuned for a
/// different stage of convergence (coarse spread, then settle, then polish).
#[derive(Debug, Clone, Copy)]
pub struct Pass {
	pub name: &'static str,
	pub iterations: u32,
	pub barnes_hut: bool,
	pub theta: f64,
	pub slow_down: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("forceatlas2 pass {0:?} produced a non-finite position for node {1:?}")]
	NonFinitePosition(&'static str, String),
}

struct Particle {
	id: String,
	x: f64,
	y: f64,
	mass: f64,
	old_dx: f64,
	old_dy: f64,
}

fn masses(snapshot: &Snapshot) -> HashMap<&str, f64> {
	let mut masses: HashMap<&str, f64> = snapshot.nodes.iter().map(|n| (n.id.as_str(), 1.0)).collect();
	for edge in &snapshot.edges {
		if edge.directed {
			*masses.entry(edge.target.as_str()).or_insert(1.0) += 1.0;
		} else {
			*masses.entry(edge.source.as_str()).or_insert(1.0) += 1.0;
			*masses.entry(edge.target.as_str()).or_insert(1.0) += 1.0;
		}
	}
	masses
}

pub fn run_pass(snapshot: &mut Snapshot, settings: &Fa2Settings, pass: &Pass) -> Result<(), Error> {
	let node_masses = masses(snapshot);
	let mut particles: Vec<Particle> = snapshot
		.nodes
		.iter()
		.map(|n| {
			let (x, y) = get_position(n).unwrap_or((0.0, 0.0));
			let mass = *node_masses.get(n.id.as_str()).unwrap_or(&1.0);
			Particle { id: n.id.clone(), x, y, mass, old_dx: 0.0, old_dy: 0.0 }
		})
		.collect();

	let index_of: HashMap<&str, usize> =
		particles.iter().enumerate().map(|(i, p)| (p.id.as_str(), i)).collect();
	let edges: Vec<(usize, usize)> = snapshot
		.edges
		.iter()
		.filter_map(|e| Some((*index_of.get(e.source.as_str())?, *index_of.get(e.target.as_str())?)))
		.collect();

	for _ in 0..pass.iterations {
		let tree = if pass.barnes_hut {
			Some(BarnesHutTree::build(&particles.iter().map(|p| (p.x, p.y, p.mass)).collect::<Vec<_>>()))
		} else {
			None
		};

		let mut forces: Vec<(f64, f64)> = particles
			.par_iter()
			.enumerate()
			.map(|(i, p)| {
				let (mut fx, mut fy) = (0.0, 0.0);
				if let Some(tree) = &tree {
					tree.accumulate_repulsion(p.x, p.y, p.mass, pass.theta, settings.scaling, &mut fx, &mut fy);
				} else {
					for (j, q) in particles.iter().enumerate() {
						if i == j {
							continue;
						}
						let dx = p.x - q.x;
						let dy = p.y - q.y;
						let d2 = (dx * dx + dy * dy).max(0.0001);
						let d = d2.sqrt();
						let force = settings.scaling * p.mass * q.mass / d2;
						fx += dx / d * force;
						fy += dy / d * force;
					}
				}
				let d = (p.x * p.x + p.y * p.y).sqrt().max(0.01);
				if settings.strong_gravity {
					fx -= settings.gravity * p.mass * p.x;
					fy -= settings.gravity * p.mass * p.y;
				} else {
					fx -= settings.gravity * p.mass * p.x / d;
					fy -= settings.gravity * p.mass * p.y / d;
				}
				(fx, fy)
			})
			.collect();

		for &(si, ti) in &edges {
			let dx = particles[si].x - particles[ti].x;
			let dy = particles[si].y - particles[ti].y;
			let d = (dx * dx + dy * dy).sqrt().max(0.01);
			let magnitude = if settings.lin_log { (1.0 + d).ln() } else { d };
			forces[si].0 -= dx / d * magnitude;
			forces[si].1 -= dy / d * magnitude;
			forces[ti].0 += dx / d * magnitude;
			forces[ti].1 += dy / d * magnitude;
		}

		let (mut swinging, mut traction) = (0.0, 0.0);
		for (i, p) in particles.iter().enumerate() {
			let (fx, fy) = forces[i];
			swinging += p.mass * ((fx - p.old_dx).powi(2) + (fy - p.old_dy).powi(2)).sqrt();
			traction += p.mass * 0.5 * ((fx + p.old_dx).powi(2) + (fy + p.old_dy).powi(2)).sqrt();
		}
		let speed = if swinging > 0.0 { (traction / swinging).min(10.0) } else { 1.0 } / pass.slow_down;

		for (i, p) in particles.iter_mut().enumerate() {
			let (fx, fy) = forces[i];
			p.x += fx * speed;
			p.y += fy * speed;
			p.old_dx = fx;
			p.old_dy = fy;
			if !p.x.is_finite() || !p.y.is_finite() {
				return Err(Error::NonFinitePosition(pass.name, p.id.clone()));
			}
		}
	}

	let positions: HashMap<&str, (f64, f64)> = particles.iter().map(|p| (p.id.as_str(), (p.x, p.y))).collect();
	for node in &mut snapshot.nodes {
		if let Some(&(x, y)) = positions.get(node.id.as_str()) {
			set_position(node, x, y);
		}
	}
	Ok(())
}
