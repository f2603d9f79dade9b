#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    CreatingNail(usize),
    Computing(usize),
    Done(usize),
}

/// Progress sink for long running steps.
pub trait Verboser {
    fn verbose(&mut self, message: Message);
}

pub struct Silent;

impl Verboser for Silent {
    fn verbose(&mut self, _: Message) {}
}

impl<F: FnMut(Message)> Verboser for F {
    fn verbose(&mut self, message: Message) {
        self(message)
    }
}
