//! Allocation tracking for metadata teardown and slot overwrite.
//!
//! Counters are per thread so the test harness's own allocations on other
//! threads do not leak into the measurements.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use node_metadata::prelude::*;

struct Counting;

thread_local! {
    static LIVE_ALLOCS: Cell<isize> = const { Cell::new(0) };
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
}

fn track(allocs: isize, bytes: isize) {
    let _ = LIVE_ALLOCS.try_with(|c| c.set(c.get() + allocs));
    let _ = LIVE_BYTES.try_with(|c| c.set(c.get() + bytes));
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            track(1, layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        track(-1, -(layout.size() as isize));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            track(0, new_size as isize - layout.size() as isize);
        }
        new_ptr
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn live() -> (isize, isize) {
    (LIVE_ALLOCS.with(Cell::get), LIVE_BYTES.with(Cell::get))
}

/// Store with every kind, more slots than fit inline, and heap strings.
fn populated() -> NodeMetadata {
    let mut meta = NodeMetadata::new(8);
    meta.set(0, "visible", true);
    meta.set(1, "lod", 2i32);
    meta.set(2, "id", 77u64);
    meta.set(3, "unit", 0.5f32);
    meta.set(4, "source", "a/fairly/long/path/to/scene.fbx");
    meta.set(5, "up", Vector3::Y);
    meta.set(6, "source", "shadowed duplicate");
    meta.set(7, "lod", 3i32);
    // Replace with a different kind.
    meta.set(7, "lod", "three");
    meta
}

/// Run every code path once so lazily registered statics are in place
/// before measuring.
fn warm_up() {
    let meta = populated();
    let _ = meta.get_by_key::<String>("source");
    let _ = meta.get_by_key::<i32>("missing");
    drop(meta);
}

#[test]
fn test_drop_releases_all_payloads() {
    warm_up();
    let before = live();

    let meta = populated();
    assert!(live().0 > before.0);
    assert_eq!(meta.get_by_key::<String>("source").unwrap(), "a/fairly/long/path/to/scene.fbx");
    drop(meta);

    assert_eq!(live(), before);
}

#[test]
fn test_empty_store_is_free() {
    warm_up();
    let before = live();

    let meta = NodeMetadata::new(0);
    assert_eq!(live(), before);
    drop(meta);
    assert_eq!(live(), before);
}

#[test]
fn test_overwrite_releases_old_payload() {
    warm_up();
    let mut meta = NodeMetadata::new(1);
    meta.set(0, "k", "x".repeat(64));
    let after_first = live();

    for _ in 0..50 {
        meta.set(0, "k", "y".repeat(64));
    }
    assert_eq!(live(), after_first);

    meta.set(0, "k", 1i32);
    assert!(live().0 < after_first.0);
    assert!(live().1 < after_first.1);

    let before_drop = live();
    drop(meta);
    assert!(live().0 < before_drop.0);
}

#[test]
fn test_clone_and_drop_balance() {
    warm_up();
    let before = live();

    let meta = populated();
    let copy = meta.clone();
    drop(meta);
    assert_eq!(copy.get::<String>(7).unwrap(), "three");
    drop(copy);

    assert_eq!(live(), before);
}
