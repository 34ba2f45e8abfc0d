//! The callable model: calling conventions, thunks, and conversion from
//! plain functions.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use mcp_schema::TypeShape;
use serde_json::Value;
use thiserror::Error;

use crate::arg::{ArgError, ToolArg, ToolParams, params_from_json};
use crate::output::ToolOutput;

/// How coerced arguments are handed to the underlying function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallingConvention {
    /// Each parameter is bound independently by name or position.
    PositionalScalars,
    /// The callable takes exactly one composite parameter; the entire
    /// argument map binds to it.
    SingleComposite,
}

/// Errors surfaced by a callable's thunk.
#[derive(Debug, Error)]
pub enum CallError {
    /// An extracted argument did not match its declared shape.
    #[error("argument {index} rejected: {source}")]
    Argument {
        /// Zero-based parameter position.
        index: usize,
        /// Underlying extraction failure.
        source: ArgError,
    },

    /// The thunk received a different number of values than declared.
    #[error("expected {expected} argument values, received {received}")]
    Arity {
        /// Declared parameter count.
        expected: usize,
        /// Values actually supplied.
        received: usize,
    },

    /// The handler itself reported a failure.
    #[error("handler failed: {reason}")]
    Handler {
        /// Human-readable reason returned by the handler.
        reason: String,
    },
}

impl CallError {
    /// Creates a handler failure from a displayable reason.
    #[must_use]
    pub fn handler(reason: impl Into<String>) -> Self {
        Self::Handler {
            reason: reason.into(),
        }
    }
}

type Thunk = Arc<dyn Fn(Vec<Value>) -> Result<Value, CallError> + Send + Sync>;

/// A registered callable, resolved once at registration time.
///
/// The reflection the reference design leaned on is replaced by this record:
/// an explicit calling convention, the ordered parameter shapes, and a thunk
/// that extracts typed arguments and performs the call. The invocation path
/// never inspects types at runtime.
#[derive(Clone)]
pub struct Callable {
    convention: CallingConvention,
    params: Vec<TypeShape>,
    type_name: &'static str,
    thunk: Thunk,
}

impl Callable {
    pub(crate) fn new(params: Vec<TypeShape>, type_name: &'static str, thunk: Thunk) -> Self {
        let convention = if params.len() == 1 && params[0].is_composite() {
            CallingConvention::SingleComposite
        } else {
            CallingConvention::PositionalScalars
        };

        Self {
            convention,
            params,
            type_name,
            thunk,
        }
    }

    /// Returns the calling convention.
    #[must_use]
    pub const fn convention(&self) -> CallingConvention {
        self.convention
    }

    /// Returns the declared parameter shapes in positional order.
    #[must_use]
    pub fn params(&self) -> &[TypeShape] {
        &self.params
    }

    /// Returns the compiler-reported type name of the source function.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the tool name this callable defaults to: the last path
    /// segment of its type name, lower-cased.
    #[must_use]
    pub fn default_name_segment(&self) -> &'static str {
        let segment = self
            .type_name
            .rsplit("::")
            .next()
            .unwrap_or(self.type_name);
        segment.trim_matches(|c| c == '{' || c == '}')
    }

    /// Invokes the thunk with one coerced value per declared parameter.
    ///
    /// # Errors
    ///
    /// Returns [`CallError`] when extraction fails or the handler reports a
    /// failure.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, CallError> {
        if args.len() != self.params.len() {
            return Err(CallError::Arity {
                expected: self.params.len(),
                received: args.len(),
            });
        }
        (self.thunk)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("convention", &self.convention)
            .field("params", &self.params)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Conversion from a plain `Fn` value into a [`Callable`].
///
/// Implemented for functions of zero through five parameters whose parameter
/// types implement [`ToolArg`] and whose return type implements
/// [`ToolOutput`]. The `Args` type parameter only disambiguates the arity.
pub trait IntoCallable<Args> {
    /// Resolves this function into a callable.
    fn into_callable(self) -> Callable;
}

fn extract<T: ToolArg>(
    values: &mut std::vec::IntoIter<Value>,
    index: usize,
) -> Result<T, CallError> {
    let value = values.next().ok_or(CallError::Arity {
        expected: index + 1,
        received: index,
    })?;
    T::from_json(value).map_err(|source| CallError::Argument { index, source })
}

impl<F, R> IntoCallable<()> for F
where
    F: Fn() -> R + Send + Sync + 'static,
    R: ToolOutput,
{
    fn into_callable(self) -> Callable {
        let type_name = std::any::type_name::<F>();
        let thunk = move |_args: Vec<Value>| self().into_value();
        Callable::new(Vec::new(), type_name, Arc::new(thunk))
    }
}

/// Marker selecting the single-composite calling convention for
/// [`IntoCallable`]. Never constructed; it only disambiguates the impl.
pub struct CompositeArgs<P>(PhantomData<P>);

impl<F, R, P> IntoCallable<CompositeArgs<P>> for F
where
    F: Fn(P) -> R + Send + Sync + 'static,
    P: ToolParams + 'static,
    R: ToolOutput,
{
    fn into_callable(self) -> Callable {
        let params = vec![TypeShape::Composite(P::composite_shape())];
        let type_name = std::any::type_name::<F>();
        let thunk = move |args: Vec<Value>| {
            let mut values = args.into_iter();
            let value = values.next().ok_or(CallError::Arity {
                expected: 1,
                received: 0,
            })?;
            let request =
                params_from_json::<P>(value).map_err(|source| CallError::Argument {
                    index: 0,
                    source,
                })?;
            self(request).into_value()
        };
        Callable::new(params, type_name, Arc::new(thunk))
    }
}

macro_rules! impl_into_callable {
    ($($ty:ident => $idx:tt),+) => {
        impl<F, R, $($ty,)+> IntoCallable<($($ty,)+)> for F
        where
            F: Fn($($ty),+) -> R + Send + Sync + 'static,
            R: ToolOutput,
            $($ty: ToolArg + 'static,)+
        {
            fn into_callable(self) -> Callable {
                let params = vec![$(<$ty as ToolArg>::shape()),+];
                let type_name = std::any::type_name::<F>();
                let thunk = move |args: Vec<Value>| {
                    let mut values = args.into_iter();
                    $(
                        #[allow(non_snake_case)]
                        let $ty = extract::<$ty>(&mut values, $idx)?;
                    )+
                    self($($ty),+).into_value()
                };
                Callable::new(params, type_name, Arc::new(thunk))
            }
        }
    };
}

impl_into_callable!(A1 => 0);
impl_into_callable!(A1 => 0, A2 => 1);
impl_into_callable!(A1 => 0, A2 => 1, A3 => 2);
impl_into_callable!(A1 => 0, A2 => 1, A3 => 2, A4 => 3);
impl_into_callable!(A1 => 0, A2 => 1, A3 => 2, A4 => 3, A5 => 4);
