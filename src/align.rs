/// Rounds `$value` up to the machine word size.
///
/// Backing blocks are always requested in whole words so the provider never
/// sees a length that ends in the middle of one.
///
/// # Examples
///
/// ```rust
/// use std::mem;
/// use regalloc::align;
///
/// match mem::size_of::<usize>() {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + ::core::mem::size_of::<usize>() - 1) & !(::core::mem::size_of::<usize>() - 1)
  };
}

/// Same as [`align!`] but returns `None` instead of wrapping around when the
/// rounded value does not fit in a `usize`.
pub(crate) fn checked_align(value: usize) -> Option<usize> {
  let word = core::mem::size_of::<usize>();
  value.checked_add(word - 1).map(|v| v & !(word - 1))
}
