/// Holds a requested season until a widget's data has loaded.
///
/// Only the latest request is kept; earlier ones are superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeasonGate {
    ready: bool,
    pending: Option<i32>,
}

impl SeasonGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn pending(&self) -> Option<i32> {
        self.pending
    }

    /// Returns the season to apply now, or `None` if it was queued.
    pub fn request(&mut self, season: i32) -> Option<i32> {
        if self.ready {
            Some(season)
        } else {
            self.pending = Some(season);
            None
        }
    }

    /// Open the gate, returning the queued season if any.
    pub fn mark_ready(&mut self) -> Option<i32> {
        self.ready = true;
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queues_latest_until_ready() {
        let mut gate = SeasonGate::new();
        assert_eq!(gate.request(2019), None);
        assert_eq!(gate.request(2020), None);
        assert_eq!(gate.pending(), Some(2020));
        assert_eq!(gate.mark_ready(), Some(2020));
        assert!(gate.is_ready());
        assert_eq!(gate.pending(), None);
    }

    #[test]
    fn passes_through_once_ready() {
        let mut gate = SeasonGate::new();
        assert_eq!(gate.mark_ready(), None);
        assert_eq!(gate.request(2021), Some(2021));
        assert_eq!(gate.pending(), None);
    }
}
