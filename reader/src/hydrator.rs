//! Per-generation hydration plans.
//!
//! Both generations run the same control flow over different tables; a
//! hydrator only says which tables, which stages and which bag shape.

use layout::{mpp8, Generation};
use store::PropsShape;

use crate::options::ReadOptions;
use crate::report::Stage;

/// Stages every generation runs, in dependency order.
const CORE_STAGES: [Stage; 6] = [
    Stage::Properties,
    Stage::Calendars,
    Stage::Resources,
    Stage::Tasks,
    Stage::Relations,
    Stage::Assignments,
];

/// Describes how one file generation is hydrated.
pub trait FormatHydrator {
    /// The generation whose descriptor tables drive hydration.
    fn generation(&self) -> Generation;

    /// Shape of the project property bag.
    fn props_shape(&self) -> PropsShape;

    /// Property key in the view directory's bag holding the summary task
    /// switch, where the generation keeps one.
    fn summary_task_property(&self) -> Option<i32> {
        None
    }

    /// Stages to run, in order.
    fn stages(&self, options: &ReadOptions) -> Vec<Stage> {
        let mut stages = CORE_STAGES.to_vec();
        let generation = self.generation();
        if options.read_views {
            if self.summary_task_property().is_some() {
                stages.push(Stage::ViewProperties);
            }
            if generation.views().is_some() {
                stages.push(Stage::Views);
            }
            if generation.tables().is_some() {
                stages.push(Stage::Tables);
            }
        }
        stages
    }
}

/// `MSProject.MPP8` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mpp8Hydrator;

impl FormatHydrator for Mpp8Hydrator {
    fn generation(&self) -> Generation {
        Generation::Mpp8
    }

    fn props_shape(&self) -> PropsShape {
        PropsShape::Legacy
    }

    fn summary_task_property(&self) -> Option<i32> {
        Some(mpp8::SHOW_PROJECT_SUMMARY_TASK)
    }
}

/// `MSProject.MPP9` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mpp9Hydrator;

impl FormatHydrator for Mpp9Hydrator {
    fn generation(&self) -> Generation {
        Generation::Mpp9
    }

    fn props_shape(&self) -> PropsShape {
        PropsShape::Current
    }
}

/// Returns the hydrator for `generation`.
#[must_use]
pub fn hydrator_for(generation: Generation) -> &'static dyn FormatHydrator {
    match generation {
        Generation::Mpp8 => &Mpp8Hydrator,
        Generation::Mpp9 => &Mpp9Hydrator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_runs_view_stages() {
        let stages = Mpp8Hydrator.stages(&ReadOptions::default());
        assert_eq!(&stages[..6], &CORE_STAGES);
        assert_eq!(
            &stages[6..],
            &[Stage::ViewProperties, Stage::Views, Stage::Tables]
        );
    }

    #[test]
    fn views_can_be_switched_off() {
        let stages = Mpp8Hydrator.stages(&ReadOptions::default().with_views(false));
        assert_eq!(stages, CORE_STAGES.to_vec());
    }

    #[test]
    fn newer_generation_has_core_stages_only() {
        assert_eq!(Mpp9Hydrator.stages(&ReadOptions::default()), CORE_STAGES.to_vec());
        assert_eq!(Mpp9Hydrator.props_shape(), PropsShape::Current);
    }

    #[test]
    fn lookup_by_generation() {
        for generation in Generation::ALL {
            assert_eq!(hydrator_for(generation).generation(), generation);
        }
    }
}
