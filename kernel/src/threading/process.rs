use crate::paging::PageManager;
use crate::sync::mutex::Mutex;
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicU16, Ordering};

pub type Pid = u16;
pub type AtomicPid = AtomicU16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessStatus {
    Unused,
    Embryo,
    Sleeping,
    Runnable,
    Running,
    Zombie,
}

pub struct ProcessControlBlock {
    pub pid: Pid,
    pub status: ProcessStatus,
    /// Number of user pages currently backed by a physical frame.
    pub rss: usize,
    pub page_manager: PageManager,
}

impl ProcessControlBlock {
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            status: ProcessStatus::Embryo,
            rss: 0,
            page_manager: PageManager::new(),
        }
    }
}

pub type ProcessRef = Arc<Mutex<ProcessControlBlock>>;

#[derive(Default)]
pub struct ProcessTable {
    content: BTreeMap<Pid, ProcessRef>,
}

impl ProcessTable {
    pub fn add(&mut self, pcb: ProcessRef) {
        let pid = pcb.lock().pid;
        assert!(
            !self.content.contains_key(&pid),
            "PCB with pid {pid} already added to process table."
        );
        self.content.insert(pid, pcb);
    }

    pub fn remove(&mut self, pid: Pid) -> Option<ProcessRef> {
        self.content.remove(&pid)
    }

    pub fn get(&self, pid: Pid) -> Option<ProcessRef> {
        self.content.get(&pid).cloned()
    }

    /// Processes in ascending pid order.
    pub fn iter(&self) -> impl Iterator<Item = &ProcessRef> {
        self.content.values()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

pub struct ProcessState {
    pub table: Mutex<ProcessTable>,
    next_pid: AtomicPid,
}

pub fn create_process_state() -> ProcessState {
    ProcessState {
        table: Mutex::default(),
        next_pid: AtomicPid::new(1),
    }
}

impl ProcessState {
    pub fn allocate_pid(&self) -> Pid {
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        assert!(pid != 0, "PID overflow");
        pid
    }

    /// Creates a runnable process with an empty address space and registers it.
    pub fn spawn(&self) -> ProcessRef {
        let mut pcb = ProcessControlBlock::new(self.allocate_pid());
        pcb.status = ProcessStatus::Runnable;
        let pcb = Arc::new(Mutex::new(pcb));
        self.table.lock().add(pcb.clone());
        pcb
    }
}
