//! Button events
//!
//! Buttons may be sampled from an interrupt or another task, so events go
//! through a bounded queue guarded by a critical section. The renderer
//! drains it once per tick.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Something a button asks the render loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Lock the active controllers and switch to the next mode
    NextMode,
    /// Return every controller to its initial value
    Reset,
    /// Step to the next brightness level
    CycleBrightness,
}

/// Bounded, interrupt-safe queue of control events
pub struct EventQueue<const SIZE: usize> {
    events: Mutex<RefCell<Deque<ControlEvent, SIZE>>>,
}

impl<const SIZE: usize> EventQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> EventSender<'_, SIZE> {
        EventSender { queue: self }
    }

    pub const fn receiver(&self) -> EventReceiver<'_, SIZE> {
        EventReceiver { queue: self }
    }

    /// Queue an event, handing it back if the queue is full
    pub fn push(&self, event: ControlEvent) -> Result<(), ControlEvent> {
        critical_section::with(|cs| self.events.borrow_ref_mut(cs).push_back(event))
    }

    pub fn pop(&self) -> Option<ControlEvent> {
        critical_section::with(|cs| self.events.borrow_ref_mut(cs).pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.events.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for EventQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side of an [`EventQueue`]
#[derive(Clone, Copy)]
pub struct EventSender<'a, const SIZE: usize> {
    queue: &'a EventQueue<SIZE>,
}

impl<const SIZE: usize> EventSender<'_, SIZE> {
    pub fn send(&self, event: ControlEvent) -> Result<(), ControlEvent> {
        self.queue.push(event)
    }
}

/// Consumer side of an [`EventQueue`]
#[derive(Clone, Copy)]
pub struct EventReceiver<'a, const SIZE: usize> {
    queue: &'a EventQueue<SIZE>,
}

impl<const SIZE: usize> EventReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Option<ControlEvent> {
        self.queue.pop()
    }
}
