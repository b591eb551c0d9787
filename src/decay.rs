use crate::error::{Error, Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

/// v(t) = v<sub>i</sub> - (v<sub>i</sub> - v<sub>f</sub>) * t / T for t < T, v<sub>f</sub> afterwards
///
/// Linear interpolation from `vi` down to `vf` over a window of `T` steps,
/// constant at `vf` once the window has elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearAnneal {
    vi: f32,
    vf: f32,
    steps: f32,
}

impl LinearAnneal {
    pub fn new(vi: f32, vf: f32, steps: u32) -> Result<Self> {
        if vi < vf {
            return Err(Error::Config(String::from(
                "initial value must not be less than floor value",
            )));
        }
        if steps == 0 {
            return Err(Error::Config(String::from("anneal window must be non-zero")));
        }
        Ok(Self {
            vi,
            vf,
            steps: steps as f32,
        })
    }
}

impl Decay for LinearAnneal {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { vi, vf, steps } = self;
        if t < steps {
            vi - (vi - vf) * (t / steps)
        } else {
            vf
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_decay() {
        let x = Constant::new(1.0);
        assert_eq!(x.evaluate(0.0), 1.0);
        assert_eq!(x.evaluate(1.0), 1.0);
    }

    #[test]
    fn linear_anneal_decay() {
        let x = LinearAnneal::new(1.0, 0.1, 1000).unwrap();
        assert_eq!(x.evaluate(0.0), 1.0);
        assert_eq!(x.evaluate(500.0), 0.55);
        assert_eq!(x.evaluate(1000.0), 0.1);
        assert_eq!(x.evaluate(5000.0), 0.1, "constant at the floor past the window");
    }

    #[test]
    fn linear_anneal_validates() {
        assert!(LinearAnneal::new(0.1, 1.0, 1000).is_err(), "vi below vf rejected");
        assert!(LinearAnneal::new(1.0, 0.1, 0).is_err(), "empty window rejected");
    }
}
