/// One-shot reveal for scroll-in animations: fires the first time the element
/// is seen and never again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reveal {
    fired: bool,
}

impl Reveal {
    pub fn is_revealed(&self) -> bool {
        self.fired
    }

    /// Feed an intersection update. Returns `true` exactly once, on the first
    /// update that reports the element as visible; the caller should stop
    /// observing at that point.
    pub fn observe(&mut self, intersecting: bool) -> bool {
        if self.fired || !intersecting {
            return false;
        }
        self.fired = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once() {
        let mut reveal = Reveal::default();
        assert!(!reveal.observe(false));
        assert!(reveal.observe(true));
        assert!(reveal.is_revealed());
        assert!(!reveal.observe(false));
        assert!(!reveal.observe(true), "re-entering the viewport must not replay");
    }
}
