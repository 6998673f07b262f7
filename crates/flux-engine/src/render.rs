//! Handing frames to a renderer.
//!
//! The driver never draws. After each step it builds a [`Frame`], an owned
//! copy of the displayable state, and passes it to a [`Renderer`]. A
//! renderer that needs to run elsewhere can forward frames over a channel
//! with [`ChannelRenderer`].

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use flux_core::{GridShape, StepId};

/// Owned snapshot of the state after a step.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Steps completed when the frame was taken.
    pub step: StepId,
    /// Grid shape.
    pub shape: GridShape,
    /// Per-cell density.
    pub density: Vec<f64>,
    /// Per-cell velocity `[ux, uy]`.
    pub velocity: Vec<[f64; 2]>,
    /// Lattice gas only: `-1` solid, `1` occupied, `0` empty.
    pub occupancy: Option<Vec<i8>>,
}

impl Frame {
    /// Speed `|u|` of every cell.
    pub fn speed(&self) -> Vec<f64> {
        self.velocity
            .iter()
            .map(|u| (u[0] * u[0] + u[1] * u[1]).sqrt())
            .collect()
    }
}

/// Consumer of frames.
pub trait Renderer {
    /// Receive the frame for one completed step.
    fn render(&mut self, frame: &Frame);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, frame: &Frame) {
        (**self).render(frame);
    }
}

/// Discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &Frame) {}
}

/// Keeps every frame in memory.
#[derive(Clone, Debug, Default)]
pub struct FrameLog {
    /// Frames in arrival order.
    pub frames: Vec<Frame>,
}

impl FrameLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for FrameLog {
    fn render(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

/// Forwards every `n`-th frame (steps `n`, `2n`, ...) to an inner renderer.
#[derive(Clone, Debug)]
pub struct Every<R> {
    n: u64,
    inner: R,
}

impl<R: Renderer> Every<R> {
    /// Forward every `n`-th frame. `n = 0` is treated as 1.
    pub fn new(n: u64, inner: R) -> Self {
        Self { n: n.max(1), inner }
    }

    /// The wrapped renderer.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Renderer> Renderer for Every<R> {
    fn render(&mut self, frame: &Frame) {
        if frame.step.0 % self.n == 0 {
            self.inner.render(frame);
        }
    }
}

/// Ships frames over a bounded channel.
///
/// A full channel drops the frame instead of blocking the simulation;
/// [`dropped()`](Self::dropped) counts how many were lost. A
/// disconnected receiver is counted the same way.
#[derive(Debug)]
pub struct ChannelRenderer {
    tx: Sender<Frame>,
    dropped: u64,
}

impl ChannelRenderer {
    /// A renderer and the receiving end of a channel holding `capacity`
    /// frames.
    pub fn bounded(capacity: usize) -> (Self, Receiver<Frame>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx, dropped: 0 }, rx)
    }

    /// Frames that could not be delivered.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl Renderer for ChannelRenderer {
    fn render(&mut self, frame: &Frame) {
        match self.tx.try_send(frame.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
            }
        }
    }
}
