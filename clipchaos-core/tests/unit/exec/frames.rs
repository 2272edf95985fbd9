use super::*;

#[test]
fn shuffle_order_is_a_permutation() {
    let mut order = shuffle_order(100, 8, 7);
    order.sort_unstable();
    assert_eq!(order, (0..100).collect::<Vec<_>>());
}

#[test]
fn shuffle_order_is_reproducible_per_seed() {
    assert_eq!(shuffle_order(100, 8, 7), shuffle_order(100, 8, 7));
    assert_ne!(shuffle_order(100, 8, 1), shuffle_order(100, 8, 2));
}

#[test]
fn shuffle_keeps_frames_inside_their_window() {
    let window = 4;
    let order = shuffle_order(20, window, 3);
    for (chunk_index, chunk) in order.chunks(window).enumerate() {
        let lo = chunk_index * window;
        for &frame in chunk {
            assert!(
                (lo..lo + window).contains(&frame),
                "frame {frame} escaped window starting at {lo}"
            );
        }
    }
}

#[test]
fn tiny_windows_are_the_identity() {
    assert_eq!(shuffle_order(10, 0, 9), (0..10).collect::<Vec<_>>());
    assert_eq!(shuffle_order(10, 1, 9), (0..10).collect::<Vec<_>>());
}

#[test]
fn loop_order_repeats_the_whole_sequence() {
    assert_eq!(loop_order(3, 2), vec![0, 1, 2, 0, 1, 2]);
    assert_eq!(loop_order(2, 3).len(), 6);
}

#[test]
fn loop_order_clamps_repeats_to_at_least_one() {
    assert_eq!(loop_order(3, 0), vec![0, 1, 2]);
}

#[test]
fn concat_list_quotes_entries() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("list.txt");
    write_concat_list(
        &list,
        [
            std::path::Path::new("/tmp/a.png"),
            std::path::Path::new("/tmp/it's.png"),
        ],
    )
    .unwrap();
    let text = std::fs::read_to_string(&list).unwrap();
    assert!(text.contains("file '/tmp/a.png'\n"));
    assert!(text.contains("file '/tmp/it'\\''s.png'\n"));
}
