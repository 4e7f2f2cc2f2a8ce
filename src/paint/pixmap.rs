//! Guarded raster-buffer allocation
//!
//! Every pixmap the engine creates goes through [`new_pixmap`], which
//! validates dimensions and reserves memory fallibly. A style with
//! absurd dimensions gets a `RenderError` instead of an OOM abort.

use crate::error::RenderError;
use tiny_skia::IntSize;
use tiny_skia::Pixmap;

const BYTES_PER_PIXEL: u64 = 4;
/// Upper bound on a single pixmap allocation to avoid process aborts on OOM.
pub(crate) const MAX_PIXMAP_BYTES: u64 = 512 * 1024 * 1024;

#[cfg(test)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NewPixmapAllocRecord {
  pub width: u32,
  pub height: u32,
  pub file: &'static str,
  pub line: u32,
}

#[cfg(test)]
thread_local! {
  static RECORD_NEW_PIXMAP: std::cell::Cell<bool> = std::cell::Cell::new(false);
  static NEW_PIXMAP_RECORDS: std::cell::RefCell<Vec<NewPixmapAllocRecord>> =
    std::cell::RefCell::new(Vec::new());
}

/// Records pixmap allocations for the current thread.
///
/// Unit tests use this to assert on allocation patterns (for example that a
/// raster-cache hit allocates nothing) without a global allocator hook.
#[cfg(test)]
pub(crate) struct NewPixmapAllocRecorder;

#[cfg(test)]
impl NewPixmapAllocRecorder {
  pub(crate) fn start() -> Self {
    RECORD_NEW_PIXMAP.with(|flag| flag.set(true));
    NEW_PIXMAP_RECORDS.with(|records| records.borrow_mut().clear());
    Self
  }

  pub(crate) fn take(&self) -> Vec<NewPixmapAllocRecord> {
    NEW_PIXMAP_RECORDS.with(|records| std::mem::take(&mut *records.borrow_mut()))
  }
}

#[cfg(test)]
impl Drop for NewPixmapAllocRecorder {
  fn drop(&mut self) {
    RECORD_NEW_PIXMAP.with(|flag| flag.set(false));
    NEW_PIXMAP_RECORDS.with(|records| records.borrow_mut().clear());
  }
}

fn guard_dimensions(width: u32, height: u32) -> Result<usize, RenderError> {
  if width == 0 || height == 0 {
    return Err(RenderError::SurfaceCreationFailed { width, height });
  }

  let pixels = (width as u64)
    .checked_mul(height as u64)
    .ok_or(RenderError::SurfaceCreationFailed { width, height })?;
  let bytes = pixels
    .checked_mul(BYTES_PER_PIXEL)
    .ok_or(RenderError::SurfaceCreationFailed { width, height })?;
  if bytes > MAX_PIXMAP_BYTES {
    return Err(RenderError::SurfaceTooLarge {
      width,
      height,
      max_bytes: MAX_PIXMAP_BYTES as usize,
    });
  }

  Ok(bytes as usize)
}

fn allocate_pixmap_bytes(bytes: usize) -> Result<Vec<u8>, RenderError> {
  let mut buffer = Vec::new();
  if buffer.try_reserve_exact(bytes).is_err() {
    return Err(RenderError::AllocationFailed { bytes });
  }
  buffer.resize(bytes, 0);
  Ok(buffer)
}

/// Creates a zeroed pixmap, validating size and allocating fallibly
#[track_caller]
pub(crate) fn new_pixmap_checked(width: u32, height: u32) -> Result<Pixmap, RenderError> {
  #[cfg(test)]
  {
    if RECORD_NEW_PIXMAP.with(|flag| flag.get()) {
      let caller = std::panic::Location::caller();
      NEW_PIXMAP_RECORDS.with(|records| {
        records.borrow_mut().push(NewPixmapAllocRecord {
          width,
          height,
          file: caller.file(),
          line: caller.line(),
        });
      });
    }
  }
  let bytes = guard_dimensions(width, height)?;
  let buffer = allocate_pixmap_bytes(bytes)?;
  let size = IntSize::from_wh(width, height).ok_or(RenderError::SurfaceCreationFailed { width, height })?;
  Pixmap::from_vec(buffer, size).ok_or(RenderError::SurfaceCreationFailed { width, height })
}

/// Creates a zeroed pixmap, or `None` when the size is unusable
///
/// Convenience wrapper for paint paths that skip-and-log on failure.
#[track_caller]
pub(crate) fn new_pixmap(width: u32, height: u32) -> Option<Pixmap> {
  new_pixmap_checked(width, height).ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_zero_dimensions() {
    assert!(matches!(
      new_pixmap_checked(0, 10),
      Err(RenderError::SurfaceCreationFailed { .. })
    ));
    assert!(matches!(
      new_pixmap_checked(10, 0),
      Err(RenderError::SurfaceCreationFailed { .. })
    ));
  }

  #[test]
  fn rejects_overflow_and_limit() {
    assert!(new_pixmap_checked(u32::MAX, 2).is_err());

    let bytes_per_row = MAX_PIXMAP_BYTES / BYTES_PER_PIXEL + 1;
    let width = bytes_per_row as u32;
    assert!(matches!(
      new_pixmap_checked(width, 1),
      Err(RenderError::SurfaceTooLarge { .. })
    ));
  }

  #[test]
  fn allocates_small_pixmaps() {
    let pixmap = new_pixmap_checked(4, 4).expect("small pixmap");
    assert_eq!(pixmap.width(), 4);
    assert_eq!(pixmap.height(), 4);
  }

  #[test]
  fn recorder_sees_allocations() {
    let recorder = NewPixmapAllocRecorder::start();
    let _ = new_pixmap(8, 8);
    let records = recorder.take();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].width, 8);
    assert_eq!(records[0].height, 8);
  }
}
