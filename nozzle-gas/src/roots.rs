use nozzle_core::Observer;
use nozzle_solve::equation::bisection::{
    self, Action, Bounds, Candidates, Config, Event, Solution, Status,
};

use crate::{
    ConfigError, Diameter, NozzleParams, Regime,
    area_mach::{AreaMachModel, DiameterProblem},
};

/// Subsonic search interval.
pub const SUBSONIC_INTERVAL: [f64; 2] = [0.01, 0.99];

/// Supersonic search interval.
pub const SUPERSONIC_INTERVAL: [f64; 2] = [1.01, 10.0];

/// Bracket used by [`RootFinder::solve_in`] callers that have no better guess.
pub const DEFAULT_BRACKET: [f64; 2] = [0.01, 5.0];

/// Roots closer than this are treated as the same root.
pub const DEFAULT_DUPLICATE_TOL: f64 = 1e-3;

/// Roots whose residual magnitude is not below this are discarded.
pub const DEFAULT_ACCEPT_TOL: f64 = 1e-6;

/// Settings for the multi-interval root scan.
#[derive(Debug, Clone, PartialEq)]
pub struct RootFinderConfig {
    /// Intervals scanned in order, each solved independently.
    pub intervals: Vec<[f64; 2]>,
    /// Fallback brackets tried when an interval shows no sign change.
    pub candidates: Candidates,
    pub bisection: Config,
    pub duplicate_tol: f64,
    pub accept_tol: f64,
}

impl Default for RootFinderConfig {
    fn default() -> Self {
        Self {
            intervals: vec![SUBSONIC_INTERVAL, SUPERSONIC_INTERVAL],
            candidates: Candidates::default(),
            bisection: Config::default(),
            duplicate_tol: DEFAULT_DUPLICATE_TOL,
            accept_tol: DEFAULT_ACCEPT_TOL,
        }
    }
}

impl RootFinderConfig {
    /// Checks tolerances and intervals.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bisection.validate().map_err(ConfigError::Bisection)?;

        for (name, value) in [
            ("duplicate_tol", self.duplicate_tol),
            ("accept_tol", self.accept_tol),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Tolerance { name, value });
            }
        }

        for interval in &self.intervals {
            Bounds::new(*interval).map_err(ConfigError::Interval)?;
        }
        Ok(())
    }
}

/// Why a converged candidate was left out of a [`RootSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Within the duplicate tolerance of an accepted root.
    Duplicate,
    /// Residual magnitude at or above the acceptance tolerance.
    Inaccurate,
}

/// Progress reported while scanning intervals.
pub enum ScanEvent<'a> {
    /// One bisection iteration inside `interval`.
    Iteration {
        interval: [f64; 2],
        event: &'a Event<'a, f64, f64>,
    },
    /// The interval produced no candidate.
    Skipped {
        interval: [f64; 2],
        error: &'a bisection::Error,
    },
    /// A candidate was found but filtered out.
    Rejected {
        interval: [f64; 2],
        mach: f64,
        residual: f64,
        reason: Rejection,
    },
    /// A candidate joined the root set.
    Accepted { interval: [f64; 2], root: &'a Root },
}

/// A Mach number satisfying the area-Mach equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub mach: f64,
    pub regime: Regime,
    /// `A*/A - (d_star/d_i)²` at `mach`.
    pub residual: f64,
    /// How bisection finished; [`Status::MaxIters`] marks a degraded estimate.
    pub status: Status,
    pub iters: usize,
}

impl Root {
    fn from_solution(solution: &Solution<f64, f64>) -> Self {
        Self {
            mach: solution.x,
            regime: Regime::of(solution.x),
            residual: solution.residual,
            status: solution.status,
            iters: solution.iters,
        }
    }
}

/// Distinct roots for one diameter, in ascending Mach order.
#[derive(Debug, Clone, PartialEq)]
pub struct RootSet {
    target: f64,
    roots: Vec<Root>,
}

impl RootSet {
    /// The right side `(d_star/d_i)²` the roots were solved for.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[must_use]
    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Root> {
        self.roots.iter()
    }
}

impl<'a> IntoIterator for &'a RootSet {
    type Item = &'a Root;
    type IntoIter = std::slice::Iter<'a, Root>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}

/// Finds every Mach number whose area ratio matches a local diameter.
///
/// Each configured interval is scanned independently: a sign-changing bracket
/// is located (falling back to the candidate list), bisection refines it, and
/// the result is kept only if it is not a duplicate and its residual is small.
#[derive(Debug, Clone, PartialEq)]
pub struct RootFinder {
    params: NozzleParams,
    config: RootFinderConfig,
}

impl Default for RootFinder {
    fn default() -> Self {
        Self {
            params: NozzleParams::default(),
            config: RootFinderConfig::default(),
        }
    }
}

impl RootFinder {
    /// Creates a root finder.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config does not validate.
    pub fn new(params: NozzleParams, config: RootFinderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { params, config })
    }

    #[must_use]
    pub fn params(&self) -> &NozzleParams {
        &self.params
    }

    #[must_use]
    pub fn config(&self) -> &RootFinderConfig {
        &self.config
    }

    /// Solves for a single root starting from `bracket`.
    ///
    /// Falls back to the configured candidates when `bracket` shows no sign
    /// change. No duplicate or accuracy filtering is applied.
    ///
    /// # Errors
    ///
    /// Returns [`bisection::Error::NoBracket`] if no sign change is found.
    pub fn solve_in(
        &self,
        local: &Diameter,
        bracket: [f64; 2],
    ) -> Result<Solution<f64, f64>, bisection::Error> {
        let model = AreaMachModel::new(self.params.heat_capacity_ratio());
        let problem = DiameterProblem::new(self.params.target_ratio(local));
        bisection::solve_with_fallback(
            &model,
            &problem,
            bracket,
            &self.config.candidates,
            &self.config.bisection,
            (),
        )
    }

    /// Returns all distinct roots for `local`, sorted ascending.
    #[must_use]
    pub fn find_roots(&self, local: &Diameter) -> RootSet {
        self.find_roots_observed(local, ())
    }

    /// Like [`find_roots`](Self::find_roots), reporting progress to `observer`.
    ///
    /// Returning [`Action::StopEarly`] from an [`ScanEvent::Iteration`] stops
    /// bisection in that interval; the estimate still goes through the filters.
    pub fn find_roots_observed<Obs>(&self, local: &Diameter, mut observer: Obs) -> RootSet
    where
        Obs: for<'a> Observer<ScanEvent<'a>, Action>,
    {
        let target = self.params.target_ratio(local);
        let model = AreaMachModel::new(self.params.heat_capacity_ratio());
        let problem = DiameterProblem::new(target);

        let mut roots: Vec<Root> = Vec::with_capacity(self.config.intervals.len());

        for &interval in &self.config.intervals {
            let result = bisection::solve_with_fallback(
                &model,
                &problem,
                interval,
                &self.config.candidates,
                &self.config.bisection,
                |event: &Event<'_, f64, f64>| {
                    observer.observe(&ScanEvent::Iteration { interval, event })
                },
            );

            let solution = match result {
                Ok(solution) => solution,
                Err(error) => {
                    observer.observe(&ScanEvent::Skipped {
                        interval,
                        error: &error,
                    });
                    continue;
                }
            };

            let reason = if roots
                .iter()
                .any(|root| (root.mach - solution.x).abs() < self.config.duplicate_tol)
            {
                Some(Rejection::Duplicate)
            } else if solution.residual.abs() < self.config.accept_tol {
                None
            } else {
                Some(Rejection::Inaccurate)
            };

            if let Some(reason) = reason {
                observer.observe(&ScanEvent::Rejected {
                    interval,
                    mach: solution.x,
                    residual: solution.residual,
                    reason,
                });
                continue;
            }

            let root = Root::from_solution(&solution);
            observer.observe(&ScanEvent::Accepted {
                interval,
                root: &root,
            });
            roots.push(root);
        }

        roots.sort_by(|a, b| a.mach.total_cmp(&b.mach));
        RootSet { target, roots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::diameter;

    fn finder_with_throat(throat: f64) -> RootFinder {
        let params = NozzleParams::new(1.25, diameter(throat).unwrap()).unwrap();
        RootFinder::new(params, RootFinderConfig::default()).unwrap()
    }

    fn assert_well_formed(set: &RootSet, finder: &RootFinder, local: &Diameter) {
        for pair in set.roots().windows(2) {
            assert!(pair[0].mach < pair[1].mach, "roots must ascend");
            assert!(pair[1].mach - pair[0].mach >= DEFAULT_DUPLICATE_TOL);
        }
        for root in set {
            assert!(root.mach >= 0.0);
            assert!(finder.params().residual(root.mach, local).abs() < DEFAULT_ACCEPT_TOL);
            assert_eq!(root.regime, Regime::of(root.mach));
        }
    }

    #[test]
    fn reference_case_has_subsonic_and_supersonic_roots() {
        let finder = RootFinder::default();
        let local = diameter(0.2).unwrap();

        let set = finder.find_roots(&local);

        assert_relative_eq!(set.target(), 0.575_322_25, epsilon = 1e-12);
        assert_eq!(set.len(), 2);
        let [sub, sup] = [set.roots()[0], set.roots()[1]];
        assert_eq!(sub.regime, Regime::Subsonic);
        assert_eq!(sup.regime, Regime::Supersonic);
        assert_relative_eq!(sub.mach, 0.364_713_838_3, epsilon = 1e-8);
        assert_relative_eq!(sup.mach, 1.950_783_846_9, epsilon = 1e-8);
        assert!(sub.status.is_converged() && sup.status.is_converged());
        assert_well_formed(&set, &finder, &local);
    }

    #[test]
    fn wider_sections_push_roots_apart() {
        let finder = RootFinder::default();
        for (d_i, sub, sup) in [
            (0.16, 0.682_639_229_2, 1.375_685_050_9),
            (0.3, 0.152_480_351_3, 2.677_092_638_5),
            (0.5, 0.054_270_544_3, 3.491_324_776_2),
            (1.0, 0.013_546_579_2, 4.606_386_582_6),
        ] {
            let local = diameter(d_i).unwrap();
            let set = finder.find_roots(&local);
            assert_eq!(set.len(), 2, "d_i = {d_i}");
            assert_relative_eq!(set.roots()[0].mach, sub, epsilon = 1e-8);
            assert_relative_eq!(set.roots()[1].mach, sup, epsilon = 1e-8);
            assert_well_formed(&set, &finder, &local);
        }
    }

    #[test]
    fn section_narrower_than_throat_has_no_roots() {
        let finder = RootFinder::default();
        for d_i in [0.1, 0.15] {
            let local = diameter(d_i).unwrap();
            assert!(finder.find_roots(&local).is_empty(), "d_i = {d_i}");
        }
    }

    #[test]
    fn very_wide_section_has_no_roots_in_range() {
        // Target ratio ~2.3e-6 lies below A*/A at both M = 0.01 and M = 10.
        let finder = RootFinder::default();
        let local = diameter(100.0).unwrap();

        let set = finder.find_roots(&local);
        assert!(set.is_empty());
        assert_relative_eq!(set.target(), (0.1517_f64 / 100.0).powi(2), epsilon = 1e-18);
    }

    #[test]
    fn throat_sized_section_collapses_to_one_root() {
        let finder = RootFinder::default();
        let local = diameter(0.1517).unwrap();

        let set = finder.find_roots(&local);
        assert_eq!(set.len(), 1);
        assert_relative_eq!(set.roots()[0].mach, 1.0, epsilon = 1e-4);
        assert_well_formed(&set, &finder, &local);
    }

    #[test]
    fn results_are_deterministic() {
        let finder = RootFinder::default();
        let local = diameter(0.27).unwrap();
        assert_eq!(finder.find_roots(&local), finder.find_roots(&local));
    }

    #[test]
    fn historical_throat_diameters_disagree() {
        // The solver function and the interactive banner once used different
        // throat diameters; 0.1517 m is the configured default.
        assert_relative_eq!(
            NozzleParams::default().throat_diameter().get::<uom::si::length::meter>(),
            0.1517
        );

        let local = diameter(0.2).unwrap();
        let current = RootFinder::default().find_roots(&local);
        let legacy = finder_with_throat(0.148).find_roots(&local);

        assert_relative_eq!(legacy.roots()[0].mach, 0.344_378_898_6, epsilon = 1e-8);
        assert_relative_eq!(legacy.roots()[1].mach, 2.000_787_884_9, epsilon = 1e-8);
        assert!((current.roots()[0].mach - legacy.roots()[0].mach).abs() > 0.01);
        assert!((current.roots()[1].mach - legacy.roots()[1].mach).abs() > 0.01);

        // At d_i = 0.15 only the smaller throat admits a solution.
        let local = diameter(0.15).unwrap();
        assert!(RootFinder::default().find_roots(&local).is_empty());
        assert_eq!(finder_with_throat(0.148).find_roots(&local).len(), 2);
    }

    #[test]
    fn repeated_interval_yields_duplicate() {
        // Scanning the subsonic interval twice lands on the same root.
        let config = RootFinderConfig {
            intervals: vec![SUBSONIC_INTERVAL, SUBSONIC_INTERVAL],
            ..RootFinderConfig::default()
        };
        let finder = RootFinder::new(NozzleParams::default(), config).unwrap();
        let local = diameter(0.2).unwrap();

        let mut rejections = Vec::new();
        let set = finder.find_roots_observed(&local, |event: &ScanEvent<'_>| {
            if let ScanEvent::Rejected { reason, .. } = event {
                rejections.push(*reason);
            }
            None
        });

        assert_eq!(set.len(), 1);
        assert_eq!(rejections, vec![Rejection::Duplicate]);
    }

    #[test]
    fn observer_sees_skipped_intervals() {
        let finder = RootFinder::default();
        let local = diameter(0.1).unwrap();

        let mut skipped = Vec::new();
        let set = finder.find_roots_observed(&local, |event: &ScanEvent<'_>| {
            if let ScanEvent::Skipped { interval, error } = event {
                assert!(matches!(error, bisection::Error::NoBracket { .. }));
                skipped.push(*interval);
            }
            None
        });

        assert!(set.is_empty());
        assert_eq!(skipped, vec![SUBSONIC_INTERVAL, SUPERSONIC_INTERVAL]);
    }

    #[test]
    fn iteration_budget_exhaustion_is_surfaced() {
        let config = RootFinderConfig {
            bisection: Config {
                max_iters: 5,
                ..Config::default()
            },
            accept_tol: 1.0,
            ..RootFinderConfig::default()
        };
        let finder = RootFinder::new(NozzleParams::default(), config).unwrap();
        let local = diameter(0.2).unwrap();

        let set = finder.find_roots(&local);
        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|root| root.status == Status::MaxIters));
        assert!(set.iter().all(|root| root.iters == 5));
    }

    #[test]
    fn inaccurate_estimates_are_dropped() {
        let config = RootFinderConfig {
            bisection: Config {
                max_iters: 5,
                ..Config::default()
            },
            ..RootFinderConfig::default()
        };
        let finder = RootFinder::new(NozzleParams::default(), config).unwrap();
        let local = diameter(0.2).unwrap();

        assert!(finder.find_roots(&local).is_empty());
    }

    #[test]
    fn solve_in_uses_fallback_grid() {
        let finder = RootFinder::default();
        let local = diameter(0.2).unwrap();

        // [0.01, 5.0] already straddles the subsonic root.
        let solution = finder.solve_in(&local, DEFAULT_BRACKET).unwrap();
        assert_relative_eq!(solution.x, 0.364_713_838_3, epsilon = 1e-8);

        // [2.5, 5.0] does not; the grid recovers [0.01, 0.5].
        let solution = finder.solve_in(&local, [2.5, 5.0]).unwrap();
        assert_relative_eq!(solution.x, 0.364_713_838_3, epsilon = 1e-8);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = RootFinderConfig {
            duplicate_tol: 0.0,
            ..RootFinderConfig::default()
        };
        assert!(matches!(
            RootFinder::new(NozzleParams::default(), config),
            Err(ConfigError::Tolerance {
                name: "duplicate_tol",
                ..
            })
        ));

        let config = RootFinderConfig {
            intervals: vec![[1.0, 1.0]],
            ..RootFinderConfig::default()
        };
        assert!(matches!(
            RootFinder::new(NozzleParams::default(), config),
            Err(ConfigError::Interval(_))
        ));
    }
}
