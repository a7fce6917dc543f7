pub mod process;

pub use process::{
    create_process_state, Pid, ProcessControlBlock, ProcessRef, ProcessState, ProcessStatus,
    ProcessTable,
};
