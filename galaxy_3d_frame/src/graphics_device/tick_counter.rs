/// TickCounter trait - elapsed-time measurement for CPU and GPU work

/// Hardware cycle timer
///
/// `update` latches the time elapsed since the last `start`; `read` returns
/// the latched value, so a reading stays stable until the next `update`.
pub trait TickCounter: Send {
    /// Start (or restart) the measurement
    fn start(&mut self);

    /// Stop the measurement and latch the elapsed time
    fn update(&mut self);

    /// Last latched elapsed time, in milliseconds
    fn read(&self) -> f32;
}
