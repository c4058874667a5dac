/// Two equally sized buffers with a flip bit selecting the current front.
///
/// Each relaxation sweep reads the front slot and writes the back slot, then
/// [`PingPong::flip`]s. [`PingPong::finish`] leaves the latest result in the
/// primary buffer regardless of how many sweeps ran.
pub struct PingPong<'a, T> {
    slots: [&'a mut [T]; 2],
    front: usize,
}

impl<'a, T: Copy> PingPong<'a, T> {
    /// `primary` holds the initial values; `secondary` is overwritten.
    pub fn new(primary: &'a mut [T], secondary: &'a mut [T]) -> Self {
        assert_eq!(
            primary.len(),
            secondary.len(),
            "ping-pong buffers must have equal length"
        );
        Self {
            slots: [primary, secondary],
            front: 0,
        }
    }

    /// `(front, back)` for one sweep.
    pub fn read_write(&mut self) -> (&[T], &mut [T]) {
        let [a, b] = &mut self.slots;
        if self.front == 0 {
            (&**a, &mut **b)
        } else {
            (&**b, &mut **a)
        }
    }

    pub fn flip(&mut self) {
        self.front ^= 1;
    }

    /// Copies the front slot into the primary buffer if it lives in the
    /// secondary one.
    pub fn finish(self) {
        let front = self.front;
        let [primary, secondary] = self.slots;
        if front == 1 {
            primary.copy_from_slice(secondary);
        }
    }
}
