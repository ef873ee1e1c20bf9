#[cfg(test)]
mod tests {
    use fs_core::service::{
        after_stage, entry_stage, ItemState, Operation, PipelineStage, Transition, WorkFlags,
    };

    #[test]
    fn entry_stage_by_operation_and_flags() {
        assert_eq!(entry_stage(Operation::Read, WorkFlags::for_read(false, false)), PipelineStage::Io);
        assert_eq!(entry_stage(Operation::Read, WorkFlags::for_read(true, true)), PipelineStage::Io);
        assert_eq!(entry_stage(Operation::Write, WorkFlags::for_write(false, true)), PipelineStage::Io);
        assert_eq!(entry_stage(Operation::Write, WorkFlags::for_write(true, false)), PipelineStage::Compression);
    }

    #[test]
    fn plain_requests_complete_after_io() {
        let read = WorkFlags::for_read(false, false);
        let write = WorkFlags::for_write(false, false);
        assert_eq!(after_stage(Operation::Read, read, PipelineStage::Io, true), Transition::Complete);
        assert_eq!(after_stage(Operation::Write, write, PipelineStage::Io, true), Transition::Complete);
        assert_eq!(after_stage(Operation::Write, write, PipelineStage::Io, false), Transition::Complete);
    }

    #[test]
    fn compressed_read_hands_off_only_on_success() {
        let flags = WorkFlags::for_read(false, true);
        assert_eq!(
            after_stage(Operation::Read, flags, PipelineStage::Io, true),
            Transition::HandOff(PipelineStage::Compression)
        );
        assert_eq!(after_stage(Operation::Read, flags, PipelineStage::Io, false), Transition::Complete);
    }

    #[test]
    fn decompression_always_completes() {
        let flags = WorkFlags::for_read(true, true);
        assert_eq!(after_stage(Operation::Read, flags, PipelineStage::Compression, true), Transition::Complete);
        assert_eq!(after_stage(Operation::Read, flags, PipelineStage::Compression, false), Transition::Complete);
    }

    #[test]
    fn compression_always_hands_off_to_io() {
        let flags = WorkFlags::for_write(true, false);
        for ok in [true, false] {
            assert_eq!(
                after_stage(Operation::Write, flags, PipelineStage::Compression, ok),
                Transition::HandOff(PipelineStage::Io)
            );
        }
    }

    #[test]
    fn compressed_write_walks_both_stages() {
        let flags = WorkFlags::for_write(true, false);
        let mut state = ItemState::Queued(entry_stage(Operation::Write, flags));

        state = state.begin().unwrap();
        assert_eq!(state, ItemState::Processing(PipelineStage::Compression));

        let t = after_stage(Operation::Write, flags, PipelineStage::Compression, true);
        state = state.settle(t).unwrap();
        assert_eq!(state, ItemState::HandedOff(PipelineStage::Io));

        state = state.requeue().unwrap();
        assert_eq!(state, ItemState::Queued(PipelineStage::Io));

        state = state.begin().unwrap();
        let t = after_stage(Operation::Write, flags, PipelineStage::Io, true);
        state = state.settle(t).unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.stage(), None);
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        assert_eq!(ItemState::Completed.begin(), None);
        assert_eq!(ItemState::Processing(PipelineStage::Io).begin(), None);
        assert_eq!(ItemState::Queued(PipelineStage::Io).settle(Transition::Complete), None);
        assert_eq!(ItemState::Completed.requeue(), None);
        // A stage cannot hand an item to itself
        assert_eq!(
            ItemState::Processing(PipelineStage::Io).settle(Transition::HandOff(PipelineStage::Io)),
            None
        );
    }

    #[test]
    fn flags_constructors() {
        let r = WorkFlags::for_read(true, false);
        assert!(r.contains(WorkFlags::NULL_TERMINATE));
        assert!(!r.contains(WorkFlags::USE_COMPRESSION));
        assert!(!r.contains(WorkFlags::APPEND_MODE));

        let w = WorkFlags::for_write(true, true);
        assert_eq!(w, WorkFlags::USE_COMPRESSION | WorkFlags::APPEND_MODE);
    }
}
