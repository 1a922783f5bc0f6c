#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pressed,
    Debounced,
    PostDebounce,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    phase: Phase,
    press_count: u8,
    stability: u8,
}

impl Debouncer {
    pub fn new(stability: u8) -> Self {
        Debouncer {
            phase: Phase::Idle,
            press_count: 0,
            stability,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn press_count(&self) -> u8 {
        self.press_count
    }

    /// Returns true exactly once per clean press.
    ///
    /// A release while `Pressed` does not rearm the counter: the next high
    /// levels keep counting from where the bounce left off.
    pub fn poll(&mut self, raw: bool) -> bool {
        match self.phase {
            Phase::Idle => {
                if raw {
                    self.phase = Phase::Pressed;
                    self.press_count = 0;
                }
                false
            }
            Phase::Pressed => {
                if raw {
                    self.press_count = self.press_count.saturating_add(1);
                    if self.press_count >= self.stability {
                        self.phase = Phase::Debounced;
                    }
                }
                false
            }
            Phase::Debounced => {
                self.phase = Phase::PostDebounce;
                true
            }
            Phase::PostDebounce => {
                if !raw {
                    self.phase = Phase::Idle;
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(deb: &mut Debouncer, levels: &[bool]) -> Vec<bool> {
        levels.iter().map(|&l| deb.poll(l)).collect()
    }

    #[test]
    fn long_hold_fires_once() {
        let mut deb = Debouncer::new(5);
        let out = feed(&mut deb, &[true; 40]);
        assert_eq!(out.iter().filter(|&&p| p).count(), 1);
        // idle -> pressed, five counts, then the debounced tick
        assert_eq!(out.iter().position(|&p| p), Some(6));
        assert_eq!(deb.phase(), Phase::PostDebounce);
    }

    #[test]
    fn new_press_needs_release_first() {
        let mut deb = Debouncer::new(5);
        let mut levels = vec![true; 10];
        levels.extend([false; 3]);
        levels.extend([true; 10]);
        let out = feed(&mut deb, &levels);
        assert_eq!(out.iter().filter(|&&p| p).count(), 2);
    }

    #[test]
    fn short_blip_is_ignored() {
        let mut deb = Debouncer::new(5);
        let mut levels = vec![true; 3];
        levels.extend([false; 20]);
        let out = feed(&mut deb, &levels);
        assert!(out.iter().all(|&p| !p));
    }

    #[test]
    fn early_release_keeps_partial_count() {
        let mut deb = Debouncer::new(5);
        // idle -> pressed, then two counted ticks
        feed(&mut deb, &[true, true, true]);
        feed(&mut deb, &[false; 10]);
        assert_eq!(deb.phase(), Phase::Pressed);
        assert_eq!(deb.press_count(), 2);

        // only three more high ticks reach the stability count
        let out = feed(&mut deb, &[true, true, true, true]);
        assert_eq!(out, vec![false, false, false, true]);
    }

    #[test]
    fn debounced_fires_even_if_released() {
        let mut deb = Debouncer::new(5);
        feed(&mut deb, &[true; 6]);
        assert_eq!(deb.phase(), Phase::Debounced);
        assert!(deb.poll(false));
        assert!(!deb.poll(false));
        assert_eq!(deb.phase(), Phase::Idle);
    }
}
