use std::collections::VecDeque;

/// Work postponed until after the current event has been handled.
///
/// Each task remembers the generation of the view that scheduled it; by the
/// time it runs that view may have been closed or replaced, so runners must
/// compare generations before touching anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    FocusSearch { generation: u64 },
    DrawPie { generation: u64 },
}

#[derive(Debug, Default)]
pub struct DeferredQueue {
    tasks: VecDeque<DeferredTask>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A task equal to one already queued replaces it.
    pub fn schedule(&mut self, task: DeferredTask) {
        self.tasks.retain(|queued| *queued != task);
        self.tasks.push_back(task);
    }

    pub fn drain(&mut self) -> Vec<DeferredTask> {
        self.tasks.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
