//! Type and scope checker.
//!
//! Grounded on `examples/original_source/src/compiler.c` for the overall
//! shape (`Compiler` state threaded through `compile_*` functions, one
//! function per grammar node) and `spec.md` §4.3 for the exact rules this
//! implementation follows instead of the C source's literal behavior
//! where the two diverge (see [`crate::scope`] and the return-type note
//! below).

use velac_par::ast::{Ast, BinaryOp, Expression, FunctionDefinition, Primary, Statement};
use velac_util::{Handler, Span};

use crate::error::SemanticError;
use crate::scope::{CompiledFunction, CompiledParameter, ScopeChain};
use crate::types::TypeInfo;

type CheckResult<T> = Result<T, SemanticError>;

/// Checks an entire program, reporting every semantic error it finds to
/// `handler` and returning the compiled function table for the functions
/// that passed.
///
/// Per `spec.md` §5 ("the top-level driver is expected to stop
/// compilation but the source does not enforce this"), a function whose
/// body fails to check is skipped rather than aborting the whole pass —
/// later functions are still checked, and their call sites are validated
/// against a function table populated strictly in source order (`spec.md`
/// §3: "no forward-reference resolution pass").
pub fn check_program<'src>(ast: &Ast<'src>, handler: &Handler) -> Vec<CompiledFunction<'src>> {
    let mut checker = Checker::new(handler);
    for function in &ast.functions {
        let _ = checker.compile_function_definition(function);
    }
    checker.functions
}

struct Checker<'h, 'src> {
    handler: &'h Handler,
    functions: Vec<CompiledFunction<'src>>,
    scopes: ScopeChain<'src>,
    frame_size: u32,
}

impl<'h, 'src> Checker<'h, 'src> {
    fn new(handler: &'h Handler) -> Self {
        Self {
            handler,
            functions: Vec::new(),
            scopes: ScopeChain::new(),
            frame_size: 0,
        }
    }

    fn error(&self, error: SemanticError, message: impl Into<String>, span: Span) -> SemanticError {
        self.handler.error(message, span);
        error
    }

    fn compile_function_definition(&mut self, def: &FunctionDefinition<'src>) -> CheckResult<()> {
        if self.functions.iter().any(|f| f.name == def.signature.name) {
            return Err(self.error(
                SemanticError::FunAlreadyExists,
                format!("function `{}` already exists", def.signature.name),
                def.signature.span,
            ));
        }

        let return_type = TypeInfo::from_name(def.signature.return_type).ok_or_else(|| {
            self.error(
                SemanticError::TypeNotExists,
                format!("no such type `{}`", def.signature.return_type),
                def.signature.span,
            )
        })?;

        self.frame_size = 0;
        self.scopes.push();

        let mut parameters = Vec::new();
        for param in &def.signature.parameters {
            if self.scopes.declared_in_current_scope(param.name) {
                self.scopes.pop();
                return Err(self.error(
                    SemanticError::VarAlreadyExists,
                    format!("parameter `{}` already exists", param.name),
                    param.span,
                ));
            }

            let type_info = match TypeInfo::from_name(param.type_name) {
                Some(t) => t,
                None => {
                    self.scopes.pop();
                    return Err(self.error(
                        SemanticError::TypeNotExists,
                        format!("no such type `{}`", param.type_name),
                        param.span,
                    ));
                }
            };
            if !type_info.valid_variable_type() {
                self.scopes.pop();
                return Err(self.error(
                    SemanticError::UnexpectedType,
                    format!("parameter `{}` cannot have type `{}`", param.name, type_info.name()),
                    param.span,
                ));
            }

            self.scopes.declare(param.name, type_info, self.frame_size);
            self.frame_size += type_info.size();
            parameters.push(CompiledParameter { name: param.name, type_info });
        }

        let mut saw_return = false;
        let body_result = self.compile_block(&def.body, return_type, &mut saw_return);
        self.scopes.pop();
        body_result?;

        if !saw_return && return_type != TypeInfo::VOID {
            return Err(self.error(
                SemanticError::UnexpectedType,
                format!(
                    "function `{}` declares return type `{}` but never returns a value",
                    def.signature.name,
                    return_type.name()
                ),
                def.signature.span,
            ));
        }

        self.functions.push(CompiledFunction {
            name: def.signature.name,
            return_type,
            parameters,
        });
        Ok(())
    }

    fn compile_block(
        &mut self,
        statements: &[Statement<'src>],
        declared_return: TypeInfo,
        saw_return: &mut bool,
    ) -> CheckResult<()> {
        for statement in statements {
            self.compile_statement(statement, declared_return, saw_return)?;
        }
        Ok(())
    }

    fn compile_statement(
        &mut self,
        statement: &Statement<'src>,
        declared_return: TypeInfo,
        saw_return: &mut bool,
    ) -> CheckResult<()> {
        match statement {
            Statement::Block(statements, _) => {
                self.scopes.push();
                let result = self.compile_block(statements, declared_return, saw_return);
                self.scopes.pop();
                result
            }
            Statement::LetAssignment { name, expr, span } => {
                let type_info = self.compile_expression(expr)?;
                if self.scopes.declared_in_current_scope(name) {
                    return Err(self.error(
                        SemanticError::VarAlreadyExists,
                        format!("variable `{name}` already exists in this scope"),
                        *span,
                    ));
                }
                self.scopes.declare(name, type_info, self.frame_size);
                self.frame_size += type_info.size();
                Ok(())
            }
            Statement::Return { expr, span } => {
                *saw_return = true;
                let observed = match expr {
                    Some(expr) => self.compile_expression(expr)?,
                    None => TypeInfo::VOID,
                };
                if observed.kind != declared_return.kind {
                    return Err(self.error(
                        SemanticError::UnexpectedType,
                        format!(
                            "unexpected return type: expected `{}`, got `{}`",
                            declared_return.name(),
                            observed.name()
                        ),
                        *span,
                    ));
                }
                Ok(())
            }
        }
    }

    fn compile_expression(&mut self, expr: &Expression<'src>) -> CheckResult<TypeInfo> {
        match expr {
            Expression::Primary(primary, span) => self.compile_primary(primary, *span),
            Expression::Binary { op, lhs, rhs, span } => self.compile_binary(*op, lhs, rhs, *span),
        }
    }

    fn compile_primary(&mut self, primary: &Primary<'src>, span: Span) -> CheckResult<TypeInfo> {
        match primary {
            Primary::Integer(_) => Ok(TypeInfo::INT),
            Primary::Floating(_) => Ok(TypeInfo::FLOAT),
            Primary::Boolean(_) => Ok(TypeInfo::BOOL),
            Primary::Identifier(name) => self
                .scopes
                .resolve(name)
                .map(|var| var.type_info)
                .ok_or_else(|| {
                    self.error(
                        SemanticError::VarNotExists,
                        format!("no such variable `{name}`"),
                        span,
                    )
                }),
            Primary::Funcall { name, arguments } => self.compile_funcall(name, arguments, span),
        }
    }

    fn compile_funcall(
        &mut self,
        name: &'src str,
        arguments: &[Expression<'src>],
        span: Span,
    ) -> CheckResult<TypeInfo> {
        let mut argument_types = Vec::with_capacity(arguments.len());
        for arg in arguments {
            argument_types.push(self.compile_expression(arg)?);
        }

        let Some(function) = self.functions.iter().find(|f| f.name == name) else {
            return Err(self.error(
                SemanticError::FunNotExists,
                format!("no such function `{name}`"),
                span,
            ));
        };

        if function.parameters.len() != argument_types.len() {
            return Err(self.error(
                SemanticError::FunArityNotMatch,
                format!(
                    "function `{name}` expects {} argument(s), got {}",
                    function.parameters.len(),
                    argument_types.len()
                ),
                span,
            ));
        }

        for (param, arg_type) in function.parameters.iter().zip(argument_types.iter()) {
            if param.type_info.kind != arg_type.kind {
                return Err(self.error(
                    SemanticError::TypeMismatch,
                    format!(
                        "argument type `{}` does not match parameter `{}`'s type `{}`",
                        arg_type.name(),
                        param.name,
                        param.type_info.name()
                    ),
                    span,
                ));
            }
        }

        Ok(function.return_type)
    }

    fn compile_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expression<'src>,
        rhs: &Expression<'src>,
        span: Span,
    ) -> CheckResult<TypeInfo> {
        let lhs_type = self.compile_expression(lhs)?;
        let rhs_type = self.compile_expression(rhs)?;

        if lhs_type.kind != rhs_type.kind {
            return Err(self.error(
                SemanticError::TypeMismatch,
                format!(
                    "type mismatch: `{}` vs `{}`",
                    lhs_type.name(),
                    rhs_type.name()
                ),
                span,
            ));
        }

        if op.is_boolean_producing() {
            if !lhs_type.valid_boolean_operand() {
                return Err(self.error(
                    SemanticError::TypeInvalidOperands,
                    format!("type `{}` is not a valid boolean operand", lhs_type.name()),
                    span,
                ));
            }
            if op.is_ordering() && !lhs_type.valid_ordering_operand() {
                return Err(self.error(
                    SemanticError::TypeInvalidOperands,
                    format!("type `{}` is not a valid ordering operand", lhs_type.name()),
                    span,
                ));
            }
            Ok(TypeInfo::BOOL)
        } else {
            if !lhs_type.valid_arithmetic_operand() {
                return Err(self.error(
                    SemanticError::TypeInvalidOperands,
                    format!("type `{}` is not a valid arithmetic operand", lhs_type.name()),
                    span,
                ));
            }
            Ok(lhs_type)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use velac_lex::Lexer;
    use velac_par::Parser;

    fn check(source: &str) -> (Vec<CompiledFunction<'_>>, bool) {
        let handler = Box::leak(Box::new(Handler::new()));
        let tokens = Lexer::new(source, handler).tokenize();
        let ast = Parser::new(tokens, handler).parse_program().unwrap();
        let functions = check_program(&ast, handler);
        (functions, handler.has_errors())
    }

    #[test]
    fn empty_function_checks_ok() {
        let (functions, has_errors) = check("def f(): void { }");
        assert!(!has_errors);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].return_type, TypeInfo::VOID);
    }

    #[test]
    fn simple_sum_checks_ok() {
        let (functions, has_errors) = check("def sum(a: int, b: int): int { return a + b; }");
        assert!(!has_errors);
        assert_eq!(functions[0].return_type, TypeInfo::INT);
    }

    #[test]
    fn type_mismatch_in_addition_is_rejected() {
        let (_, has_errors) = check("def f(): void { let x = 1 + 1.0; }");
        assert!(has_errors);
    }

    #[test]
    fn unknown_variable_is_rejected() {
        let (_, has_errors) = check("def f(): void { let y = x; }");
        assert!(has_errors);
    }

    #[test]
    fn arity_mismatch_is_rejected() {
        let (_, has_errors) =
            check("def f(a: int): int { return a; } def g(): int { return f(); }");
        assert!(has_errors);
    }

    #[test]
    fn bool_arithmetic_is_rejected() {
        let (_, has_errors) = check("def f(): bool { return true + false; }");
        assert!(has_errors);
    }

    #[test]
    fn inner_scope_may_shadow_outer_variable() {
        let (_, has_errors) = check(
            "def f(): int { let x = 1; { let x = 2; return x; } return x; }",
        );
        assert!(!has_errors);
    }

    #[test]
    fn duplicate_in_same_scope_is_rejected() {
        let (_, has_errors) = check("def f(): void { let x = 1; let x = 2; }");
        assert!(has_errors);
    }

    #[test]
    fn missing_return_in_non_void_function_is_rejected() {
        let (_, has_errors) = check("def f(): int { let x = 1; }");
        assert!(has_errors);
    }

    #[test]
    fn calling_a_function_defined_earlier_is_allowed() {
        let (_, has_errors) =
            check("def f(): int { return 1; } def g(): int { return f(); }");
        assert!(!has_errors);
    }
}
