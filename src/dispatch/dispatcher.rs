//! Recursive type→spec dispatch.

use crate::convert::{Conversion, ConversionPipeline};
use crate::dispatch::spec::{ArgSpec, Arity, FlagAction, TokenParser};
use crate::error::BindError;
use crate::options::BindOptions;
use crate::registry::NameRegistry;
use crate::schema::TypeExpr;
use crate::value::{Scalar, Value};

/// Maps one parameter's type expression to a concrete argument specification,
/// recording renames and post-parse conversions along the way.
pub struct Dispatcher<'a> {
    registry: &'a mut NameRegistry,
    conversions: &'a mut ConversionPipeline,
    options: &'a BindOptions,
    /// Suppressed during the recursive call under a custom converter so the
    /// converter cannot dispatch onto itself.
    dispatch_custom: bool,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        registry: &'a mut NameRegistry,
        conversions: &'a mut ConversionPipeline,
        options: &'a BindOptions,
    ) -> Self {
        Self {
            registry,
            conversions,
            options,
            dispatch_custom: true,
        }
    }

    /// Dispatch one parameter.
    ///
    /// `default` is `Value::None` when the parameter has no resolvable
    /// default. Dispatching the same `(name, ty)` twice yields structurally
    /// equal specs; registry and pipeline side effects are idempotent.
    pub fn dispatch(
        &mut self,
        name: &str,
        ty: &TypeExpr,
        default: &Value,
        required: bool,
    ) -> Result<ArgSpec, BindError> {
        tracing::debug!("dispatch: {name} ({ty:?}) default={default:?} required={required}");

        if self.dispatch_custom {
            if let Some(custom) = self.options.use_custom.get(name).cloned() {
                let input_ty = match custom.input {
                    Some(ty) => ty,
                    None => {
                        tracing::warn!(
                            "argument {name} has a custom converter without a declared \
                             input type, assuming str"
                        );
                        TypeExpr::string()
                    }
                };
                tracing::debug!(
                    "a custom converter for {name} was configured, dispatching on its \
                     input type {input_ty:?}"
                );
                let saved = self.dispatch_custom;
                self.dispatch_custom = false;
                let inner = self.dispatch(name, &input_ty, default, required);
                self.dispatch_custom = saved;
                let inner = inner?;

                // Keyed by the original name so renames inside the recursive
                // dispatch do not move the conversion.
                self.conversions
                    .register(name, Conversion::Custom(custom.func));
                return Ok(inner);
            }
        }

        // Plural container flags are renamed to their singular form unless
        // explicitly exempted.
        let mut name = name.to_string();
        if matches!(ty, TypeExpr::List(_) | TypeExpr::Set(_))
            && !self.options.ignore_rename.contains(&name)
            && name.ends_with('s')
        {
            let singular = name[..name.len() - 1].to_string();
            name = self.registry.register(&name, &singular);
        }

        match ty {
            TypeExpr::Scalar(Scalar::Bool) => self.dispatch_bool(name, default, required),
            TypeExpr::List(element) | TypeExpr::Set(element) => {
                let element = self.dispatch(&name, element, default, required)?;
                if matches!(ty, TypeExpr::Set(_)) {
                    let original = self.registry.resolve(&name);
                    self.conversions.register(&original, Conversion::CollectSet);
                }
                Ok(ArgSpec {
                    name: element.name,
                    parser: element.parser,
                    default: element.default,
                    required: element.required,
                    arity: Arity::Multi,
                    choices: element.choices,
                    action: None,
                })
            }
            TypeExpr::Literal(values) => self.dispatch_literal(name, values, default, required),
            TypeExpr::Optional(inner) => {
                if !default.is_none() {
                    tracing::warn!(
                        "argument {name} is optional but was declared with the non-none \
                         default '{default}'"
                    );
                }
                // Optionality only relaxes required-ness; arity and parser
                // come from the concrete inner type.
                self.dispatch(&name, inner, default, false)
            }
            TypeExpr::Union(members) => self.dispatch_union(name, members, default, required),
            TypeExpr::Scalar(scalar) => {
                let original = self.registry.resolve(&name);
                if matches!(scalar, Scalar::Str | Scalar::Path)
                    && self.options.use_glob.contains(&original)
                {
                    self.conversions.register(&original, Conversion::Flatten);
                    return Ok(ArgSpec {
                        name,
                        parser: TokenParser::Glob(*scalar),
                        default: default.clone(),
                        required,
                        arity: Arity::Single,
                        choices: None,
                        action: None,
                    });
                }
                Ok(ArgSpec {
                    name,
                    parser: TokenParser::Scalar(*scalar),
                    default: default.clone(),
                    required,
                    arity: Arity::Single,
                    choices: None,
                    action: None,
                })
            }
        }
    }

    fn dispatch_bool(
        &mut self,
        name: String,
        default: &Value,
        required: bool,
    ) -> Result<ArgSpec, BindError> {
        let resolved = match default {
            Value::None => false,
            Value::Bool(b) => *b,
            other => {
                return Err(BindError::BadBoolDefault {
                    name,
                    value: other.clone(),
                })
            }
        };

        // A true-by-default flag flips to a negated spelling: presence of
        // --no_<name> disables it.
        let name = if resolved {
            self.registry.register(&name, &format!("no_{name}"))
        } else {
            name
        };
        let action = if resolved {
            FlagAction::StoreFalse
        } else {
            FlagAction::StoreTrue
        };

        Ok(ArgSpec {
            name,
            parser: TokenParser::Scalar(Scalar::Bool),
            default: Value::Bool(resolved),
            required,
            arity: Arity::Single,
            choices: None,
            action: Some(action),
        })
    }

    fn dispatch_literal(
        &mut self,
        name: String,
        values: &[Value],
        default: &Value,
        required: bool,
    ) -> Result<ArgSpec, BindError> {
        let mut kinds: Vec<&'static str> = Vec::new();
        for value in values {
            let kind = value.scalar_kind().map(|k| k.name()).unwrap_or("non-scalar");
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        let shared = match (kinds.len(), values.first().and_then(Value::scalar_kind)) {
            (1, Some(kind)) => kind,
            _ => {
                return Err(BindError::MixedLiteral {
                    name,
                    detail: if kinds.is_empty() {
                        "no members".to_string()
                    } else {
                        kinds.join(", ")
                    },
                })
            }
        };

        let inner = self.dispatch(&name, &TypeExpr::Scalar(shared), default, required)?;
        Ok(ArgSpec {
            name: inner.name,
            parser: inner.parser,
            default: inner.default,
            required: inner.required,
            arity: Arity::Single,
            choices: Some(values.to_vec()),
            action: None,
        })
    }

    fn dispatch_union(
        &mut self,
        name: String,
        members: &[TypeExpr],
        default: &Value,
        required: bool,
    ) -> Result<ArgSpec, BindError> {
        if members.len() < 2 {
            return Err(BindError::UnsupportedUnion {
                name,
                detail: "a union needs at least two member types".to_string(),
            });
        }
        if members.iter().any(|m| matches!(m, TypeExpr::Optional(_))) {
            return Err(BindError::UnsupportedUnion {
                name,
                detail: "union members may not be optional".to_string(),
            });
        }

        tracing::warn!(
            "argument {name} uses a type union; union support is provisional and \
             subject to change"
        );

        let mut specs = Vec::with_capacity(members.len());
        for member in members {
            specs.push(self.dispatch(&name, member, default, required)?);
        }
        let parsers = specs.iter().map(|s| s.parser.clone()).collect();
        let first = specs.remove(0);

        Ok(ArgSpec {
            name: first.name,
            parser: TokenParser::Union(parsers),
            default: first.default,
            required: first.required,
            arity: first.arity,
            choices: first.choices,
            action: first.action,
        })
    }
}
