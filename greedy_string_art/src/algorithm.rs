use std::{
    ops::Range,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use num_traits::AsPrimitive;
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    geometry::Point,
    raster::raster,
    sequence::Step,
    verboser::{Message, Verboser},
    Canvas, ChannelRotation, Error, ExclusionRule, Float, Mode, NailTable, Params, Sequence,
    Target, ValidParams,
};

/// Runs the greedy selector for `params.iterations` steps over `target`.
///
/// `cancel` is polled between iterations; once raised the run stops with
/// [`Error::Cancelled`].
pub fn compute<S: Float>(
    params: &Params,
    target: Target<S>,
    verboser: &mut impl Verboser,
    cancel: &Cancel,
) -> Result<Computation<S>>
where
    usize: AsPrimitive<S>,
    f64: AsPrimitive<S>,
{
    let params = params.validate()?;
    info!(
        resolution = params.resolution,
        iterations = params.iterations,
        nail_count = params.nail_count,
        strength = params.string_strength,
        mode = ?params.mode,
        color_change_interval = ?params.color_change_interval,
        "starting run"
    );
    let mut state = RunState::new(&params, target, verboser)?;
    for iteration in 1..=params.iterations {
        if cancel.is_cancelled() {
            warn!(completed = iteration - 1, "run cancelled");
            return Err(Error::Cancelled {
                completed: iteration - 1,
            });
        }
        verboser.verbose(Message::Computing(iteration - 1));
        state.step(iteration)?;
    }
    verboser.verbose(Message::Done(params.iterations));
    let computation = state.finish();
    info!(
        steps = computation.sequence.len(),
        error = %computation.canvas.error(&computation.target),
        "run finished"
    );
    Ok(computation)
}

/// Cooperative cancellation flag shared with a running [`compute`].
#[derive(Clone, Debug, Default)]
pub struct Cancel(Arc<AtomicBool>);

impl Cancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything a run owns while it iterates.
pub struct RunState<S> {
    params: ValidParams,
    nails: NailTable<S>,
    target: Target<S>,
    canvas: Canvas<S>,
    strength: S,
    start: Point<S>,
    current: Point<S>,
    previous: Option<Point<S>>,
    rotation: Option<ChannelRotation>,
    sequence: Sequence,
    buffers: Vec<BatchBuffer<S>>,
}

impl<S: Float> RunState<S>
where
    usize: AsPrimitive<S>,
    f64: AsPrimitive<S>,
{
    pub fn new(
        params: &ValidParams,
        target: Target<S>,
        verboser: &mut impl Verboser,
    ) -> Result<Self> {
        let side = params.resolution as usize;
        if target.grid().width != side || target.grid().height != side {
            return Err(Error::configuration(
                "resolution",
                params.resolution,
                "does not match the target size",
            ));
        }
        if target.mode() != params.mode {
            return Err(Error::configuration(
                "mode",
                format!("{:?}", params.mode),
                "does not match the target planes",
            ));
        }
        let nails = NailTable::<S>::circle(params.nail_count, params.radius().as_(), verboser)?;
        // The thread starts on the right edge, not on a nail.
        let start: Point<S> = Point {
            x: (side - 1).as_(),
            y: (side / 2 - 1).as_(),
        };
        Ok(Self {
            canvas: Canvas::blank(&target),
            strength: params.string_strength.as_(),
            rotation: params.color_change_interval.map(ChannelRotation::new),
            sequence: Sequence::with_capacity(params.iterations),
            buffers: BatchBuffer::new(nails.len(), num_cpus::get()),
            start,
            current: start,
            previous: None,
            params: params.clone(),
            nails,
            target,
        })
    }

    /// Picks the next nail, draws the chord to it and records it.
    /// `iteration` is 1-based.
    pub fn step(&mut self, iteration: usize) -> Result<usize> {
        let plane = self.plane();
        let Some(winner) = self.select() else {
            warn!(iteration, current = %self.current, "no eligible nail");
            return Err(Error::NoCandidate {
                iteration,
                partial: self.sequence.clone(),
            });
        };
        let end = self.nails.nails()[winner.nail];
        self.canvas.apply(
            plane,
            raster(self.current.truncate(), end.truncate()),
            self.strength,
        );
        debug!(iteration, nail = winner.nail, score = %winner.score, "chord drawn");

        self.sequence.push(Step {
            nail: winner.nail,
            channel: self.rotation.map(|rotation| rotation.channel()),
            group: self.rotation.map_or(0, |rotation| rotation.advances()),
        });
        self.previous = Some(self.current);
        self.current = end;
        if let Some(rotation) = self.rotation.as_mut() {
            rotation.tick(iteration);
        }
        Ok(winner.nail)
    }

    /// Best scoring eligible nail from the current position.
    ///
    /// Ties go to the highest nail index: batches scan in increasing order
    /// replacing on `>=`, and their winners are merged the same way.
    fn select(&mut self) -> Option<Candidate<S>> {
        let plane = self.plane();
        let exclusion = Exclusion {
            rule: self.params.exclusion,
            current: self.current,
            previous: self.previous,
        };
        let (nails, target, canvas, strength) =
            (&self.nails, &self.target, &self.canvas, self.strength);
        let buffers = &mut self.buffers;
        let from = self.current.truncate();

        buffers.par_iter_mut().for_each(|buffer| {
            let mut best = S::INITIAL_BEST;
            buffer.result = None;
            for nail in buffer.range.clone() {
                let position = nails.nails()[nail];
                if exclusion.excludes(position) {
                    continue;
                }
                let coverage = raster(from, position.truncate());
                let score = canvas.improvement(plane, target, coverage, strength);
                if score >= best {
                    best = score;
                    buffer.result = Some(Candidate { nail, score });
                }
            }
        });

        BatchBuffer::merge(&self.buffers)
    }

    fn plane(&self) -> usize {
        self.rotation
            .map_or(0, |rotation| rotation.channel().plane())
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }

    pub fn finish(self) -> Computation<S> {
        Computation {
            channel_advances: self.rotation.map(|rotation| rotation.advances()),
            params: self.params,
            nails: self.nails,
            target: self.target,
            canvas: self.canvas,
            start: self.start,
            sequence: self.sequence,
        }
    }
}

/// Result of a finished run.
pub struct Computation<S> {
    pub(crate) params: ValidParams,
    pub(crate) nails: NailTable<S>,
    pub(crate) target: Target<S>,
    pub(crate) canvas: Canvas<S>,
    pub(crate) start: Point<S>,
    pub(crate) sequence: Sequence,
    pub(crate) channel_advances: Option<usize>,
}

impl<S: Copy> Computation<S> {
    pub fn params(&self) -> &ValidParams {
        &self.params
    }

    pub fn nails(&self) -> &NailTable<S> {
        &self.nails
    }

    pub fn canvas(&self) -> &Canvas<S> {
        &self.canvas
    }

    pub fn target(&self) -> &Target<S> {
        &self.target
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Where the thread was tied before the first chord.
    pub fn start(&self) -> Point<S> {
        self.start
    }

    /// How many times the strand colour changed, `None` for monochrome runs.
    pub fn channel_advances(&self) -> Option<usize> {
        self.channel_advances
    }

    pub fn mode(&self) -> Mode {
        self.params.mode
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate<S> {
    nail: usize,
    score: S,
}

#[derive(Clone, Copy)]
struct Exclusion<S> {
    rule: ExclusionRule,
    current: Point<S>,
    previous: Option<Point<S>>,
}

impl<S: Float> Exclusion<S> {
    fn excludes(&self, position: Point<S>) -> bool {
        match self.rule {
            ExclusionRule::Nail => position == self.current || Some(position) == self.previous,
            ExclusionRule::SharedCoordinate => {
                let shares = |other: Point<S>| position.x == other.x || position.y == other.y;
                shares(self.current) || self.previous.is_some_and(shares)
            }
        }
    }
}

struct BatchBuffer<S> {
    range: Range<usize>,
    result: Option<Candidate<S>>,
}

impl<S> BatchBuffer<S> {
    /// At most `batch_count` contiguous ranges of nails, in increasing order.
    fn new(nail_count: usize, batch_count: usize) -> Vec<Self> {
        let chunk_size = nail_count.div_ceil(batch_count.max(1)).max(1);
        (0..nail_count)
            .step_by(chunk_size)
            .map(|start| BatchBuffer {
                range: start..nail_count.min(start + chunk_size),
                result: None,
            })
            .collect()
    }

    /// Winner across batches, later batches taking ties.
    fn merge(buffers: &[Self]) -> Option<Candidate<S>>
    where
        S: Float,
    {
        let mut best = S::INITIAL_BEST;
        let mut winner = None;
        for candidate in buffers.iter().filter_map(|buffer| buffer.result) {
            if candidate.score >= best {
                best = candidate.score;
                winner = Some(candidate);
            }
        }
        winner
    }
}
