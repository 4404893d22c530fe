//! Fluent program construction
//!
//! Front-ends and tests build programs statement by statement, naming locals
//! by string. Locals are created on first mention.
//!
//! ```rust,ignore
//! let mut pb = ProgramBuilder::new();
//! pb.class("Foo", None, &[]);
//! let main = pb.function("main", |b| {
//!     b.new_object("a", "Foo").assign("b", "a");
//! });
//! pb.entry(main);
//! let program = pb.build()?;
//! ```

use super::program::{Body, ClassDecl, FieldDecl, Local, Method, Param, Program, ProgramDecl};
use super::signature::{ClassSignature, FieldSignature, MethodSignature};
use super::stmt::{InvokeExpr, LValue, RValue, Stmt};
use super::types::Type;
use crate::errors::Result;
use crate::shared::LocalId;

/// Builds a [`ProgramDecl`] and validates it into a [`Program`]
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    decl: ProgramDecl,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a class with untyped fields
    pub fn class(&mut self, name: &str, super_class: Option<&str>, fields: &[&str]) -> &mut Self {
        self.decl.classes.push(ClassDecl {
            signature: ClassSignature::new(name),
            super_class: super_class.map(ClassSignature::new),
            fields: fields
                .iter()
                .map(|f| FieldDecl {
                    name: f.to_string(),
                    ty: Type::Unknown,
                })
                .collect(),
        });
        self
    }

    /// Add a fully formed method
    pub fn method(&mut self, method: Method) -> &mut Self {
        self.decl.methods.push(method);
        self
    }

    /// Add a top-level function
    pub fn function(&mut self, name: &str, build: impl FnOnce(&mut BodyBuilder)) -> MethodSignature {
        let sig = MethodSignature::function(name);
        let mut body = BodyBuilder::new(false);
        build(&mut body);
        self.push_body_method(sig.clone(), true, body);
        sig
    }

    /// Add an instance method; the body starts with a `this` local
    pub fn instance_method(
        &mut self,
        class: &str,
        name: &str,
        build: impl FnOnce(&mut BodyBuilder),
    ) -> MethodSignature {
        let sig = MethodSignature::new(class, name);
        let mut body = BodyBuilder::new(true);
        build(&mut body);
        self.push_body_method(sig.clone(), false, body);
        sig
    }

    /// Add a method without a body (platform/SDK API)
    pub fn opaque(&mut self, sig: MethodSignature, params: Vec<Param>, return_type: Type) -> &mut Self {
        self.decl.methods.push(Method {
            signature: sig,
            is_static: true,
            params,
            return_type,
            body: None,
        });
        self
    }

    pub fn entry(&mut self, sig: MethodSignature) -> &mut Self {
        self.decl.entry_points.push(sig);
        self
    }

    pub fn into_decl(self) -> ProgramDecl {
        self.decl
    }

    pub fn build(self) -> Result<Program> {
        Program::from_decl(self.decl)
    }

    fn push_body_method(&mut self, sig: MethodSignature, is_static: bool, body: BodyBuilder) {
        let body = body.finish();
        let params = body
            .param_locals
            .iter()
            .filter_map(|&l| body.local(l))
            .map(|l| Param {
                name: l.name.clone(),
                ty: l.ty.clone(),
            })
            .collect();
        self.decl.methods.push(Method {
            signature: sig,
            is_static,
            params,
            return_type: Type::Unknown,
            body: Some(body),
        });
    }
}

/// Builds one method body
#[derive(Debug)]
pub struct BodyBuilder {
    body: Body,
}

impl BodyBuilder {
    fn new(with_this: bool) -> Self {
        let mut builder = Self {
            body: Body::default(),
        };
        if with_this {
            let this = builder.local("this");
            builder.body.this_local = Some(this);
        }
        builder
    }

    /// Id of the named local, created on first use
    pub fn local(&mut self, name: &str) -> LocalId {
        self.typed_local(name, Type::Unknown)
    }

    /// Like [`local`](Self::local); the type only applies on creation
    pub fn typed_local(&mut self, name: &str, ty: Type) -> LocalId {
        if let Some(id) = self.body.local_id(name) {
            return id;
        }
        self.body.locals.push(Local {
            name: name.to_string(),
            ty,
        });
        (self.body.locals.len() - 1) as LocalId
    }

    /// Declare the next parameter
    pub fn param(&mut self, name: &str) -> &mut Self {
        self.typed_param(name, Type::Unknown)
    }

    pub fn typed_param(&mut self, name: &str, ty: Type) -> &mut Self {
        let id = self.typed_local(name, ty);
        self.body.param_locals.push(id);
        self
    }

    pub fn stmt(&mut self, stmt: Stmt) -> &mut Self {
        self.body.stmts.push(stmt);
        self
    }

    fn assign_to(&mut self, dst: &str, rhs: RValue) -> &mut Self {
        let lhs = LValue::Local(self.local(dst));
        self.stmt(Stmt::Assign { lhs, rhs })
    }

    /// `dst = new class()`
    pub fn new_object(&mut self, dst: &str, class: &str) -> &mut Self {
        self.assign_to(dst, RValue::New(ClassSignature::new(class)))
    }

    /// `dst = []`
    pub fn new_array(&mut self, dst: &str) -> &mut Self {
        self.assign_to(dst, RValue::NewArray(Type::Unknown))
    }

    /// `dst = src`
    pub fn assign(&mut self, dst: &str, src: &str) -> &mut Self {
        let src = self.local(src);
        self.assign_to(dst, RValue::Local(src))
    }

    /// `dst = <constant>`
    pub fn constant(&mut self, dst: &str) -> &mut Self {
        self.assign_to(dst, RValue::Constant)
    }

    /// `dst = base.field`
    pub fn load(&mut self, dst: &str, base: &str, field: FieldSignature) -> &mut Self {
        let base = self.local(base);
        self.assign_to(dst, RValue::InstanceField { base, field })
    }

    /// `base.field = src`
    pub fn store(&mut self, base: &str, field: FieldSignature, src: &str) -> &mut Self {
        let base = self.local(base);
        let src = self.local(src);
        self.stmt(Stmt::Assign {
            lhs: LValue::InstanceField { base, field },
            rhs: RValue::Local(src),
        })
    }

    /// `dst = Class.field`
    pub fn load_static(&mut self, dst: &str, field: FieldSignature) -> &mut Self {
        self.assign_to(dst, RValue::StaticField(field))
    }

    /// `Class.field = src`
    pub fn store_static(&mut self, field: FieldSignature, src: &str) -> &mut Self {
        let src = self.local(src);
        self.stmt(Stmt::Assign {
            lhs: LValue::StaticField(field),
            rhs: RValue::Local(src),
        })
    }

    /// `dst = base[i]`
    pub fn load_elem(&mut self, dst: &str, base: &str) -> &mut Self {
        let base = self.local(base);
        self.assign_to(dst, RValue::ArrayElem { base })
    }

    /// `base[i] = src`
    pub fn store_elem(&mut self, base: &str, src: &str) -> &mut Self {
        let base = self.local(base);
        let src = self.local(src);
        self.stmt(Stmt::Assign {
            lhs: LValue::ArrayElem { base },
            rhs: RValue::Local(src),
        })
    }

    /// `dst = method` as a function value
    pub fn func_ref(&mut self, dst: &str, method: MethodSignature) -> &mut Self {
        self.assign_to(dst, RValue::MethodRef(method))
    }

    fn args(&mut self, args: &[&str]) -> Vec<LocalId> {
        args.iter().map(|a| self.local(a)).collect()
    }

    fn invoke(&mut self, result: Option<&str>, call: InvokeExpr) -> &mut Self {
        let result = result.map(|r| self.local(r));
        self.stmt(Stmt::Invoke { result, call })
    }

    /// `result = method(args)`
    pub fn call_static(&mut self, result: Option<&str>, method: MethodSignature, args: &[&str]) -> &mut Self {
        let args = self.args(args);
        self.invoke(result, InvokeExpr::Static { method, args })
    }

    /// `result = base.method(args)`
    pub fn call(
        &mut self,
        result: Option<&str>,
        base: &str,
        method: MethodSignature,
        args: &[&str],
    ) -> &mut Self {
        let base = self.local(base);
        let args = self.args(args);
        self.invoke(result, InvokeExpr::Instance { base, method, args })
    }

    /// `result = target(args)` through a function value
    pub fn call_ptr(&mut self, result: Option<&str>, target: &str, args: &[&str]) -> &mut Self {
        let target = self.local(target);
        let args = self.args(args);
        self.invoke(result, InvokeExpr::Pointer { target, args })
    }

    pub fn ret(&mut self, value: Option<&str>) -> &mut Self {
        let value = value.map(|v| self.local(v));
        self.stmt(Stmt::Return { value })
    }

    pub fn finish(self) -> Body {
        self.body
    }
}
