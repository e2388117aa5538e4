pub type Result<T, DE> = core::result::Result<T, Error<DE>>;

#[derive(Debug)]
pub enum Error<DE> {
    // Display transfer error
    Display(DE),
    // Report did not fit the buffer
    BufferWrite,
}
