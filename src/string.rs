//! NUL-terminated string duplication into arena storage.

use std::{
  ffi::{CStr, c_char},
  num::NonZeroUsize,
  ptr, slice,
};

use crate::{arena::Arena, provider::BlockProvider};

impl<P: BlockProvider> Arena<P> {
  /// Copies `bytes` into the arena followed by a NUL terminator, consuming
  /// exactly `bytes.len() + 1` bytes.
  ///
  /// Every byte is copied, but if `bytes` contains a NUL the returned
  /// string ends at the first one.
  pub fn strndup(
    &self,
    bytes: &[u8],
  ) -> &CStr {
    let length = bytes.len();
    let region = self.reserve(NonZeroUsize::MIN.saturating_add(length)).as_ptr();

    unsafe {
      ptr::copy_nonoverlapping(bytes.as_ptr(), region, length);
      region.add(length).write(0);

      let terminator = bytes.iter().position(|&b| b == 0).unwrap_or(length);
      CStr::from_bytes_with_nul_unchecked(slice::from_raw_parts(region, terminator + 1))
    }
  }

  /// Copies `string` and its terminator into the arena.
  pub fn strdup(
    &self,
    string: &CStr,
  ) -> &CStr {
    self.strndup(string.to_bytes())
  }

  /// Copies `length` bytes from `string` followed by a NUL terminator.
  ///
  /// # Safety
  ///
  /// `string` must be valid for reads of `length` bytes.
  pub unsafe fn strndup_raw(
    &self,
    string: *const c_char,
    length: usize,
  ) -> *mut c_char {
    let region = self.reserve(NonZeroUsize::MIN.saturating_add(length)).as_ptr();

    unsafe {
      ptr::copy_nonoverlapping(string.cast::<u8>(), region, length);
      region.add(length).write(0);
    }

    region.cast::<c_char>()
  }

  /// Copies the NUL-terminated `string` into the arena.
  ///
  /// # Safety
  ///
  /// `string` must point to a NUL-terminated sequence within readable
  /// memory.
  pub unsafe fn strdup_raw(
    &self,
    string: *const c_char,
  ) -> *mut c_char {
    unsafe { self.strndup_raw(string, libc::strlen(string)) }
  }
}
