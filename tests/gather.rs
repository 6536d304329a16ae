#[cfg(test)]
mod tests {
    use vinculum::frame::GatherCursor;

    /// Copies up to `limit` bytes from the cursor's segments, in
    /// order, the way a size-limited transport would.
    fn take(cursor: &mut GatherCursor, limit: usize, sink: &mut Vec<u8>) -> usize {
        let mut taken = 0;

        for segment in cursor.segments() {
            if taken == limit {
                break;
            }

            let n = (limit - taken).min(segment.len());
            sink.extend_from_slice(&segment[..n]);
            taken += n;
        }

        cursor.advance(taken);
        taken
    }

    #[test]
    fn test_header_and_payload_complete_in_eleven_attempts() {
        let header = [0x11; 40];
        let payload = [0x22; 1000];

        let mut cursor = GatherCursor::new(&header, &payload);
        assert_eq!(cursor.remaining(), 1040);

        let mut wire = Vec::new();
        let mut attempts = 0;

        while !cursor.is_empty() {
            let n = take(&mut cursor, 100, &mut wire);
            assert!(n > 0);
            attempts += 1;
        }

        assert_eq!(attempts, 11);

        let mut expected = header.to_vec();
        expected.extend_from_slice(&payload);
        assert_eq!(wire, expected);
    }

    #[test]
    fn test_empty_payload_builds_single_segment() {
        let header = [0x11; 40];

        let cursor = GatherCursor::new(&header, &[]);
        assert_eq!(cursor.segments().len(), 1);
        assert_eq!(cursor.remaining(), 40);
    }

    #[test]
    fn test_advance_crosses_segment_boundary() {
        let header = [0x11; 4];
        let payload = [0x22; 8];

        let mut cursor = GatherCursor::new(&header, &payload);
        cursor.advance(6);

        assert_eq!(cursor.remaining(), 6);
        assert_eq!(cursor.segments().len(), 1);
        assert_eq!(cursor.segments()[0], &payload[2..]);
    }

    #[test]
    fn test_advance_exact_segment_length_drops_it() {
        let header = [0x11; 4];
        let payload = [0x22; 8];

        let mut cursor = GatherCursor::new(&header, &payload);
        cursor.advance(4);

        assert_eq!(cursor.segments().len(), 1);
        assert_eq!(cursor.segments()[0], &payload[..]);
    }

    #[test]
    fn test_advance_to_completion() {
        let header = [0x11; 4];
        let payload = [0x22; 8];

        let mut cursor = GatherCursor::new(&header, &payload);
        cursor.advance(12);

        assert!(cursor.is_empty());
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.segments().is_empty());
    }

    #[test]
    #[should_panic(expected = "gather cursor advanced past its segments")]
    fn test_advance_past_end_panics() {
        let header = [0x11; 4];
        let payload = [0x22; 8];

        let mut cursor = GatherCursor::new(&header, &payload);
        cursor.advance(13);
    }
}
