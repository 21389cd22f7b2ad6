// @generated by polystruct: delegation for `Task` through field `base`. Do not edit.

impl ITask for Task {
    fn is_complete(&mut self) -> bool {
        self.base.is_complete()
    }

    fn execute(&mut self) {
        Task::execute(self)
    }

    fn duration(&self, precise: bool, previous: &mut u64) -> u64 {
        self.base.duration(precise, previous)
    }

    fn label(&self) -> String {
        ::core::clone::Clone::clone(&self.base.label)
    }

    fn cancel(&mut self) -> bool {
        Task::cancel(self)
    }
}
