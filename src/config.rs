use thiserror::Error;

use crate::numerics::sparse::{AssemblyError, StencilShape};
use crate::physics::jacobian::JacobianType;
use crate::physics::pbratu::PBratuParams;

pub const USAGE: &str = "Usage:
  pbratu [options]

Options:
  -lambda <real>                  Bratu parameter (default 6.0)
  -p <real>                       Exponent `p' in the p-Laplacian (default 2.0)
  -epsilon <real>                 Strain regularization, > 0 (default 1e-5)
  -jtype <1|2|3|4>                Jacobian type: 1=plain, 2=Picard, 3=star, 4=full (default 4)
  -use-analytic-jacobian <bool>   Assemble the analytic Jacobian; false falls back
                                  to automatic differentiation (default true)
  -allocate-star-pattern <bool>   Preallocate the 5-point pattern instead of the
                                  9-point one; incompatible with -jtype 4 (default false)
  -mx <int>, -my <int>            Grid points per direction, >= 2 (default 32)
  -help                           Print this message";

/// Recognized runtime options with their defaults.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub params: PBratuParams,
    pub jtype: JacobianType,
    pub analytic_jacobian: bool,
    pub allocate_star_pattern: bool,
    pub mx: usize,
    pub my: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            params: PBratuParams::default(),
            jtype: JacobianType::NewtonBox,
            analytic_jacobian: true,
            allocate_star_pattern: false,
            mx: 32,
            my: 32,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("option '{0}' expects a value")]
    MissingValue(String),
    #[error("invalid value '{1}' for option '{0}'")]
    InvalidValue(String, String),
    #[error(transparent)]
    Jacobian(#[from] AssemblyError),
    #[error("epsilon must be positive, got {0}")]
    NonPositiveEpsilon(f64),
    #[error("grid needs at least 2 points per direction, got {0}x{1}")]
    GridTooSmall(usize, usize),
}

fn parse_value<T: std::str::FromStr>(
    opt: &str,
    it: &mut impl Iterator<Item = String>,
) -> Result<T, ConfigError> {
    let raw = it.next().ok_or_else(|| ConfigError::MissingValue(opt.into()))?;
    raw.parse()
        .map_err(|_| ConfigError::InvalidValue(opt.into(), raw))
}

impl Options {
    /// Parse command-line arguments (without the program name).
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ConfigError> {
        let mut opts = Options::default();
        let mut it = args.into_iter();
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "-lambda" => opts.params.lambda = parse_value(&arg, &mut it)?,
                "-p" => opts.params.p = parse_value(&arg, &mut it)?,
                "-epsilon" => opts.params.epsilon = parse_value(&arg, &mut it)?,
                "-jtype" => {
                    let v: i64 = parse_value(&arg, &mut it)?;
                    opts.jtype = JacobianType::from_index(v)?;
                }
                "-use-analytic-jacobian" => opts.analytic_jacobian = parse_value(&arg, &mut it)?,
                "-allocate-star-pattern" => {
                    opts.allocate_star_pattern = parse_value(&arg, &mut it)?
                }
                "-mx" => opts.mx = parse_value(&arg, &mut it)?,
                "-my" => opts.my = parse_value(&arg, &mut it)?,
                _ => return Err(ConfigError::UnknownOption(arg)),
            }
        }
        if opts.params.epsilon <= 0.0 {
            return Err(ConfigError::NonPositiveEpsilon(opts.params.epsilon));
        }
        if opts.mx < 2 || opts.my < 2 {
            return Err(ConfigError::GridTooSmall(opts.mx, opts.my));
        }
        Ok(opts)
    }

    /// The sparsity pattern the driver preallocates.
    pub fn pattern(&self) -> StencilShape {
        if self.allocate_star_pattern {
            StencilShape::Star
        } else {
            StencilShape::Box
        }
    }
}
