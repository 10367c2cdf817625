use core::fmt;

use super::*;

/// How many steps it takes a slider to go from one end to the other.
pub const STEPS_PER_RANGE: Float = 100.0;

/// The parameters a user can tweak.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SliderId {
    N1,
    N2,
    N3,
    Thickness,
    Theta1,
}

impl SliderId {
    pub const ALL: [Self; 5] = [Self::N1, Self::N2, Self::N3, Self::Thickness, Self::Theta1];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::N1 => "n1",
            Self::N2 => "n2",
            Self::N3 => "n3",
            Self::Thickness => "l",
            Self::Theta1 => "θ1",
        }
    }

    #[must_use]
    pub const fn bounds(self) -> Bounds {
        match self {
            Self::N1 => N1_BOUNDS,
            Self::N2 => N2_BOUNDS,
            Self::N3 => N3_BOUNDS,
            Self::Thickness => THICKNESS_BOUNDS,
            Self::Theta1 => THETA1_BOUNDS,
        }
    }

    /// The parameter this slider controls
    #[must_use]
    pub fn get(self, params: &PrismParams) -> Float {
        match self {
            Self::N1 => params.n1,
            Self::N2 => params.n2,
            Self::N3 => params.n3,
            Self::Thickness => params.l,
            Self::Theta1 => params.theta1,
        }
    }

    fn get_mut(self, params: &mut PrismParams) -> &mut Float {
        match self {
            Self::N1 => &mut params.n1,
            Self::N2 => &mut params.n2,
            Self::N3 => &mut params.n3,
            Self::Thickness => &mut params.l,
            Self::Theta1 => &mut params.theta1,
        }
    }
}

/// A value constrained to an interval, that remembers where it started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slider {
    id: SliderId,
    initial: Float,
    value: Float,
}

impl Slider {
    /// `initial` is clamped into `id`'s bounds.
    #[must_use]
    pub fn new(id: SliderId, initial: Float) -> Self {
        let initial = id.bounds().clamp(initial);
        Self {
            id,
            initial,
            value: initial,
        }
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> SliderId {
        self.id
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> Float {
        self.value
    }

    #[inline]
    #[must_use]
    pub const fn initial(&self) -> Float {
        self.initial
    }

    /// Returns whether the value changed.
    pub fn set(&mut self, value: Float) -> bool {
        let value = self.id.bounds().clamp(value);
        let changed = value != self.value;
        self.value = value;
        changed
    }

    /// Move by `steps` (possibly fractional, or negative) [`STEPS_PER_RANGE`]ths of the range.
    pub fn step(&mut self, steps: Float) -> bool {
        self.set(self.value + steps * self.id.bounds().span() / STEPS_PER_RANGE)
    }

    pub fn reset(&mut self) -> bool {
        self.set(self.initial)
    }
}

/// The five sliders driving a [`PrismTrace`], and a reset button.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlPanel {
    sliders: [Slider; 5],
    selected: SliderId,
    changed: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(&PrismParams::default())
    }
}

impl ControlPanel {
    /// Sliders start at (and reset to) `initial`, clamped into their bounds.
    #[must_use]
    pub fn new(initial: &PrismParams) -> Self {
        Self {
            sliders: SliderId::ALL.map(|id| Slider::new(id, id.get(initial))),
            selected: SliderId::N1,
            changed: true,
        }
    }

    #[must_use]
    pub fn params(&self) -> PrismParams {
        let mut params = PrismParams::default();
        for slider in &self.sliders {
            *slider.id.get_mut(&mut params) = slider.value;
        }
        params
    }

    #[inline]
    #[must_use]
    pub fn slider(&self, id: SliderId) -> &Slider {
        &self.sliders[id.index()]
    }

    #[inline]
    pub fn sliders(&self) -> impl Iterator<Item = &Slider> {
        self.sliders.iter()
    }

    #[inline]
    #[must_use]
    pub const fn selected(&self) -> SliderId {
        self.selected
    }

    #[inline]
    pub fn select(&mut self, id: SliderId) {
        self.selected = id;
    }

    pub fn set(&mut self, id: SliderId, value: Float) {
        self.changed |= self.sliders[id.index()].set(value);
    }

    pub fn step_selected(&mut self, steps: Float) {
        self.changed |= self.sliders[self.selected.index()].step(steps);
    }

    /// Put every slider back to its initial value.
    pub fn reset(&mut self) {
        for slider in &mut self.sliders {
            self.changed |= slider.reset();
        }
    }

    /// Whether any slider moved since the last call. The first call always returns `true`.
    pub fn take_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }
}

impl fmt::Display for ControlPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slider) in self.sliders.iter().enumerate() {
            if i > 0 {
                f.write_str("  ")?;
            }

            let id = slider.id;
            let precision = if id == SliderId::Thickness { 3 } else { 2 };

            if id == self.selected {
                write!(f, "[{} = {:.*}]", id.label(), precision, slider.value)?;
            } else {
                write!(f, "{} = {:.*}", id.label(), precision, slider.value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sliders_clamp_to_their_bounds() {
        let mut slider = Slider::new(SliderId::N3, 1.33);

        assert!(slider.set(10.0));
        assert_eq!(slider.value(), 3.0);
        assert!(!slider.set(4.0));

        slider.set(-1.0);
        assert_eq!(slider.value(), 0.5);

        assert!(slider.reset());
        assert_eq!(slider.value(), 1.33);
    }

    #[test]
    fn initial_values_are_clamped() {
        let slider = Slider::new(SliderId::Theta1, 90.0);
        assert_eq!(slider.initial(), 89.99);
    }

    #[test]
    fn steps_are_a_fraction_of_the_range() {
        let mut slider = Slider::new(SliderId::Thickness, 0.1);
        slider.step(1.0);
        assert_relative_eq!(slider.value(), 0.1 + 0.19 / STEPS_PER_RANGE, epsilon = 1e-12);
        slider.step(-1000.0);
        assert_eq!(slider.value(), 0.01);
    }

    #[test]
    fn panel_round_trips_params() {
        let params = PrismParams {
            n1: 1.1,
            n2: 2.2,
            n3: 0.7,
            l: 0.05,
            theta1: 12.0,
        };
        assert_eq!(ControlPanel::new(&params).params(), params);
    }

    #[test]
    fn reset_restores_initial_params() {
        let mut panel = ControlPanel::default();
        assert!(panel.take_changed());
        assert!(!panel.take_changed());

        panel.select(SliderId::Theta1);
        panel.step_selected(10.0);
        panel.set(SliderId::N2, 2.5);
        assert!(panel.take_changed());

        let params = panel.params();
        assert_relative_eq!(params.theta1, 45.0 + 10.0 * 89.89 / STEPS_PER_RANGE, epsilon = 1e-9);
        assert_eq!(params.n2, 2.5);

        panel.reset();
        assert!(panel.take_changed());
        assert_eq!(panel.params(), PrismParams::default());

        // nothing to reset
        panel.reset();
        assert!(!panel.take_changed());
    }

    #[test]
    fn panel_params_are_always_valid() {
        let mut panel = ControlPanel::default();
        for id in SliderId::ALL {
            panel.select(id);
            panel.step_selected(1e6);
        }
        assert_eq!(panel.params().validate(), Ok(()));
    }

    #[test]
    fn display_marks_the_selection() {
        let mut panel = ControlPanel::default();
        panel.select(SliderId::Thickness);
        assert_eq!(
            panel.to_string(),
            "n1 = 1.00  n2 = 1.50  n3 = 1.33  [l = 0.100]  θ1 = 45.00"
        );
    }

    #[test]
    fn ids_and_indices_agree() {
        for (i, id) in SliderId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }
}
