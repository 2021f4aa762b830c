//! A minimal Barnes-Hut quadtree used to approximate long-range repulsion in
//! ForceAtlas2. Each leaf holds one particle; internal nodes cache the total
//! mass and center of mass of their subtree so a distant cluster of nodes can
//! be treated as a single pseudo-body, controlled by the accuracy parameter
//! θ (`theta`): smaller θ means more exact (and slower).

struct Quad {
	cx: f64,
	cy: f64,
	half: f64,
}

impl Quad {
	fn child(&self, which: usize) -> Quad {
		let half = self.half / 2.0;
		let (dx, dy) = match which {
			0 => (-half, -half),
			1 => (half, -half),
			2 => (-half, half),
			_ => (half, half),
		};
		Quad { cx: self.cx + dx, cy: self.cy + dy, half }
	}

	fn quadrant_of(&self, x: f64, y: f64) -> usize {
		match (x >= self.cx, y >= self.cy) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}
}

enum Node {
	Empty,
	Leaf { index: usize, x: f64, y: f64, mass: f64 },
	Internal { mass: f64, cx: f64, cy: f64, children: Box<[Node; 4]> },
}

pub struct BarnesHutTree {
	root: Node,
	quad: Quad,
}

impl BarnesHutTree {
	pub fn build(points: &[(f64, f64, f64)]) -> Self {
		let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y, _) in points {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}
		if !min_x.is_finite() {
			min_x = -1.0;
			min_y = -1.0;
			max_x = 1.0;
			max_y = 1.0;
		}
		let half = ((max_x - min_x).max(max_y - min_y) / 2.0).max(1.0) + 1.0;
		let quad = Quad { cx: (min_x + max_x) / 2.0, cy: (min_y + max_y) / 2.0, half };

		let mut root = Node::Empty;
		for (i, &(x, y, mass)) in points.iter().enumerate() {
			insert(&mut root, &quad, i, x, y, mass);
		}
		BarnesHutTree { root, quad }
	}

	/// Accumulates the approximate repulsive force on `(x, y, mass)` into `(fx, fy)`.
	pub fn accumulate_repulsion(&self, x: f64, y: f64, mass: f64, theta: f64, strength: f64, fx: &mut f64, fy: &mut f64) {
		accumulate(&self.root, &self.quad, x, y, mass, theta, strength, fx, fy);
	}
}

fn insert(node: &mut Node, quad: &Quad, index: usize, x: f64, y: f64, mass: f64) {
	match node {
		Node::Empty => {
			*node = Node::Leaf { index, x, y, mass };
		},
		Node::Leaf { index: other_index, x: ox, y: oy, mass: om } => {
			let (other_index, ox, oy, om) = (*other_index, *ox, *oy, *om);
			let mut children: [Node; 4] = [Node::Empty, Node::Empty, Node::Empty, Node::Empty];
			let oq = quad.quadrant_of(ox, oy);
			insert(&mut children[oq], &quad.child(oq), other_index, ox, oy, om);
			let nq = quad.quadrant_of(x, y);
			insert(&mut children[nq], &quad.child(nq), index, x, y, mass);
			*node = Node::Internal { mass: om + mass, cx: (ox * om + x * mass) / (om + mass), cy: (oy * om + y * mass) / (om + mass), children: Box::new(children) };
		},
		Node::Internal { mass: total_mass, cx, cy, children } => {
			*cx = (*cx * *total_mass + x * mass) / (*total_mass + mass);
			*cy = (*cy * *total_mass + y * mass) / (*total_mass + mass);
			*total_mass += mass;
			let q = quad.quadrant_of(x, y);
			insert(&mut children[q], &quad.child(q), index, x, y, mass);
		},
	}
}

#[allow(clippy::too_many_arguments)]
fn accumulate(node: &Node, quad: &Quad, x: f64, y: f64, mass: f64, theta: f64, strength: f64, fx: &mut f64, fy: &mut f64) {
	match node {
		Node::Empty => {},
		Node::Leaf { x: ox, y: oy, mass: om, .. } => {
			apply_repulsion(x, y, mass, *ox, *oy, *om, strength, fx, fy);
		},
		Node::Internal { mass: total_mass, cx, cy, children } => {
			let dx = x - cx;
			let dy = y - cy;
			let d = (dx * dx + dy * dy).sqrt().max(0.01);
			if (quad.half * 2.0) / d < theta {
				apply_repulsion(x, y, mass, *cx, *cy, *total_mass, strength, fx, fy);
			} else {
				for (i, child) in children.iter().enumerate() {
					accumulate(child, &quad.child(i), x, y, mass, theta, strength, fx, fy);
				}
			}
		},
	}
}

fn apply_repulsion(x: f64, y: f64, mass: f64, ox: f64, oy: f64, other_mass: f64, strength: f64, fx: &mut f64, fy: &mut f64) {
	let dx = x - ox;
	let dy = y - oy;
	let d2 = (dx * dx + dy * dy).max(0.0001);
	let d = d2.sqrt();
	let force = strength * mass * other_mass / d2;
	*fx += dx / d * force;
	*fy += dy / d * force;
}
