#[cfg(test)]
mod tests {
    use fs_core::heap::{Heap, HeapStats};

    #[test]
    fn alloc_is_tracked_until_drop() {
        let heap = Heap::new("test");
        let a = heap.alloc(100);
        let b = heap.alloc(28);
        assert_eq!(heap.stats(), HeapStats { allocations: 2, bytes: 128 });
        assert!(a.iter().all(|&x| x == 0));

        drop(a);
        assert_eq!(heap.stats(), HeapStats { allocations: 1, bytes: 28 });
        drop(b);
        assert_eq!(heap.stats(), HeapStats::default());
    }

    #[test]
    fn adopt_keeps_contents() {
        let heap = Heap::new("adopt");
        let buf = heap.adopt(b"payload".to_vec());
        assert_eq!(&buf[..], b"payload");
        assert_eq!(buf.heap_name(), "adopt");
        assert_eq!(heap.stats().bytes, 7);
    }

    #[test]
    fn truncate_updates_tracked_size() {
        let heap = Heap::new("truncate");
        let mut buf = heap.alloc(64);
        buf.truncate(10);
        assert_eq!(buf.len(), 10);
        assert_eq!(heap.stats().bytes, 10);
    }

    #[test]
    fn into_vec_leaves_the_heap() {
        let heap = Heap::new("into_vec");
        let buf = heap.adopt(vec![1, 2, 3]);
        let v = buf.into_vec();
        assert_eq!(v, vec![1, 2, 3]);
        assert_eq!(heap.stats(), HeapStats::default());
    }

    #[test]
    fn report_leaks_counts_outstanding() {
        let heap = Heap::new("leaks");
        assert_eq!(heap.report_leaks(), 0);
        let _held = heap.alloc(5);
        assert_eq!(heap.report_leaks(), 1);
    }

    #[test]
    fn clones_share_state_and_buffers_move_across_threads() {
        let heap = Heap::new("shared");
        let other = heap.clone();
        assert!(heap.same_heap(&other));
        assert!(!heap.same_heap(&Heap::new("shared")));

        let buf = std::thread::spawn(move || other.alloc(16)).join().unwrap();
        assert_eq!(heap.stats().allocations, 1);
        drop(buf);
        assert_eq!(heap.stats().allocations, 0);
    }
}
