use design_studio::error::InvariantViolation;
use design_studio::raster::{BufferTarget, PixelBuffer, PixelStore};

fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            buffer.set_pixel(x, y, [x as u8, y as u8, 0, 255]);
        }
    }
    buffer
}

#[test]
fn test_load_copies_into_both_buffers() {
    let mut store = PixelStore::new();
    assert!(!store.is_loaded());

    let snapshot = store.load(gradient(8, 6));
    assert!(store.is_loaded());
    assert_eq!(store.dimensions(), Some((8, 6)));
    assert_eq!(store.original(), store.current());
    assert_eq!(Some(&snapshot), store.current());
}

#[test]
fn test_read_region_clips_to_buffer() {
    let mut store = PixelStore::new();
    store.load(gradient(10, 10));

    let region = store.read_region(-2, 7, 5, 5);
    assert_eq!((region.origin.x, region.origin.y), (0, 7));
    assert_eq!((region.origin.width, region.origin.height), (3, 3));
    assert_eq!(region.pixels.dimensions(), (3, 3));
    assert_eq!(region.pixels.pixel(0, 0), [0, 7, 0, 255]);

    let outside = store.read_region(20, 20, 4, 4);
    assert!(outside.origin.is_empty());
}

#[test]
fn test_read_region_without_image_is_empty() {
    let store = PixelStore::new();
    let region = store.read_region(0, 0, 4, 4);
    assert!(region.origin.is_empty());
    assert_eq!(region.pixels.dimensions(), (0, 0));
}

#[test]
fn test_write_region_targets_current_only() {
    let mut store = PixelStore::new();
    store.load(gradient(10, 10));
    let patch = PixelBuffer::filled(4, 4, [9, 9, 9, 9]);

    assert_eq!(
        store.write_region(BufferTarget::Original, 0, 0, &patch),
        Err(InvariantViolation::OriginalIsReadOnly)
    );

    let written = store.write_region(BufferTarget::Current, 8, -1, &patch).unwrap();
    assert_eq!((written.x, written.y, written.width, written.height), (8, 0, 2, 3));
    let current = store.current().unwrap();
    assert_eq!(current.pixel(9, 2), [9, 9, 9, 9]);
    assert_eq!(current.pixel(7, 0), [7, 0, 0, 255]);
    assert_eq!(store.original().unwrap().pixel(9, 2), [9, 2, 0, 255]);
}

#[test]
fn test_write_without_image_fails() {
    let mut store = PixelStore::new();
    let patch = PixelBuffer::filled(2, 2, [1, 2, 3, 4]);
    assert_eq!(
        store.write_region(BufferTarget::Current, 0, 0, &patch),
        Err(InvariantViolation::NoImage)
    );
}

#[test]
fn test_snapshot_is_a_deep_copy() {
    let mut store = PixelStore::new();
    store.load(gradient(4, 4));
    let snapshot = store.snapshot().unwrap();

    store
        .write_region(BufferTarget::Current, 0, 0, &PixelBuffer::new(4, 4))
        .unwrap();
    assert_ne!(store.current(), Some(&snapshot));

    store.restore(&snapshot).unwrap();
    assert_eq!(store.current(), Some(&snapshot));
}

#[test]
fn test_restore_rejects_other_dimensions() {
    let mut store = PixelStore::new();
    store.load(gradient(4, 4));
    let err = store.restore(&PixelBuffer::new(5, 4)).unwrap_err();
    assert_eq!(
        err,
        InvariantViolation::DimensionMismatch {
            want_w: 4,
            want_h: 4,
            got_w: 5,
            got_h: 4
        }
    );
}

#[test]
fn test_from_raw_checks_length() {
    assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
    assert_eq!(
        PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err(),
        InvariantViolation::BadPixelData {
            width: 2,
            height: 2,
            len: 15
        }
    );
}
