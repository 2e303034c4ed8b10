//! Fixed-capacity position history used to draw fading orbit trails

use glam::DVec3;

/// How opacity varies along a trail, oldest to newest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadePolicy {
    /// Oldest point transparent, newest opaque
    #[default]
    FadeOut,
    /// Oldest point opaque, newest transparent
    FadeIn,
}

impl FadePolicy {
    /// Opacity for a normalized age `t` in `[0, 1)`, where 0 is the oldest entry
    pub fn alpha(self, t: f32) -> f32 {
        match self {
            FadePolicy::FadeOut => t,
            FadePolicy::FadeIn => 1.0 - t,
        }
    }
}

/// Ring buffer holding the last `capacity` positions of a body.
///
/// Appending is O(1); once full, the oldest slot is overwritten and is never
/// read again.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    slots: Vec<DVec3>,
    capacity: usize,
    write_index: usize,
    count: usize,
    fade: FadePolicy,
}

impl TrailBuffer {
    pub fn new(capacity: usize, fade: FadePolicy) -> Self {
        Self {
            slots: vec![DVec3::ZERO; capacity],
            capacity,
            write_index: 0,
            count: 0,
            fade,
        }
    }

    pub fn append(&mut self, position: DVec3) {
        if self.capacity == 0 {
            return;
        }
        let idx = self.write_index % self.capacity;
        self.slots[idx] = position;
        self.write_index = (idx + 1) % self.capacity;
        self.count = (self.count + 1).min(self.capacity);
    }

    pub fn clear(&mut self) {
        self.write_index = 0;
        self.count = 0;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently appended position
    pub fn latest(&self) -> Option<DVec3> {
        if self.count == 0 {
            return None;
        }
        Some(self.slots[self.slot_of(self.count - 1)])
    }

    /// Live positions, oldest first
    pub fn iter(&self) -> impl ExactSizeIterator<Item = DVec3> + '_ {
        (0..self.count).map(move |i| self.slots[self.slot_of(i)])
    }

    /// Live positions, oldest first, paired with their opacity under this
    /// trail's fade policy
    pub fn iter_faded(&self) -> impl ExactSizeIterator<Item = (DVec3, f32)> + '_ {
        let count = self.count;
        let fade = self.fade;
        self.iter()
            .enumerate()
            .map(move |(i, pos)| (pos, fade.alpha(i as f32 / count as f32)))
    }

    /// Calls `f(position, t)` with `t = i / len` for every live entry, oldest first
    pub fn for_each_oldest_to_newest<F>(&self, mut f: F)
    where
        F: FnMut(DVec3, f32),
    {
        let count = self.count;
        for (i, pos) in self.iter().enumerate() {
            f(pos, i as f32 / count as f32);
        }
    }

    /// Slot holding the `i`-th oldest live entry.
    ///
    /// The newest entry sits at `write_index - 1`; walking back `count - 1 - i`
    /// steps from there lands on entry `i`.
    fn slot_of(&self, i: usize) -> usize {
        let back = self.count - 1 - i;
        (self.write_index + self.capacity - 1 - back) % self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64) -> DVec3 {
        DVec3::new(x, 0.0, 0.0)
    }

    #[test]
    fn keeps_last_n_in_insertion_order() {
        let mut trail = TrailBuffer::new(4, FadePolicy::FadeOut);
        for i in 0..11 {
            trail.append(p(i as f64));
        }
        assert_eq!(trail.len(), 4);
        let xs: Vec<f64> = trail.iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![7.0, 8.0, 9.0, 10.0]);
        assert_eq!(trail.latest(), Some(p(10.0)));
    }

    #[test]
    fn partial_fill_reads_only_written_slots() {
        let mut trail = TrailBuffer::new(5, FadePolicy::FadeOut);
        trail.append(p(1.0));
        trail.append(p(2.0));
        let xs: Vec<f64> = trail.iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut trail = TrailBuffer::new(0, FadePolicy::FadeOut);
        trail.append(p(1.0));
        assert!(trail.is_empty());
        assert_eq!(trail.latest(), None);
        assert_eq!(trail.iter().count(), 0);
    }

    #[test]
    fn fade_out_makes_oldest_transparent() {
        let mut trail = TrailBuffer::new(4, FadePolicy::FadeOut);
        for i in 0..4 {
            trail.append(p(i as f64));
        }
        let alphas: Vec<f32> = trail.iter_faded().map(|(_, a)| a).collect();
        assert_eq!(alphas, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn fade_in_makes_oldest_opaque() {
        let mut trail = TrailBuffer::new(2, FadePolicy::FadeIn);
        trail.append(p(0.0));
        trail.append(p(1.0));
        let alphas: Vec<f32> = trail.iter_faded().map(|(_, a)| a).collect();
        assert_eq!(alphas, vec![1.0, 0.5]);
    }

    #[test]
    fn for_each_reports_normalized_age() {
        let mut trail = TrailBuffer::new(3, FadePolicy::FadeOut);
        for i in 0..5 {
            trail.append(p(i as f64));
        }
        let mut seen = Vec::new();
        trail.for_each_oldest_to_newest(|pos, t| seen.push((pos.x, t)));
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].0, 2.0);
        assert_eq!(seen[2].0, 4.0);
        assert!((seen[1].1 - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut trail = TrailBuffer::new(3, FadePolicy::FadeOut);
        trail.append(p(1.0));
        trail.clear();
        assert!(trail.is_empty());
        assert_eq!(trail.capacity(), 3);
        trail.append(p(9.0));
        assert_eq!(trail.iter().collect::<Vec<_>>(), vec![p(9.0)]);
    }
}
