//! Whole-program IR
//!
//! [`ProgramDecl`] is the serde shape a front-end emits; [`Program`] is the
//! validated, indexed form the analysis reads. A `Program` is immutable once
//! built and can be shared between independent analysis runs.

use super::signature::{ClassSignature, FieldSignature, MethodSignature};
use super::stmt::{Stmt, StmtRef};
use super::types::Type;
use crate::errors::{PtaError, Result};
use crate::shared::{LocalId, MethodId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Declared field of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(default)]
    pub ty: Type,
}

/// Class declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub signature: ClassSignature,
    #[serde(default)]
    pub super_class: Option<ClassSignature>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl ClassDecl {
    pub fn field_signature(&self, name: &str) -> Option<FieldSignature> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| FieldSignature {
                class: self.signature.clone(),
                name: f.name.clone(),
            })
    }
}

/// Declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default)]
    pub ty: Type,
}

/// Local variable slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Local {
    pub name: String,
    #[serde(default)]
    pub ty: Type,
}

/// Method body
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Body {
    pub locals: Vec<Local>,
    /// Local bound to the receiver
    #[serde(default)]
    pub this_local: Option<LocalId>,
    /// Locals bound to the parameters, in declaration order
    #[serde(default)]
    pub param_locals: Vec<LocalId>,
    pub stmts: Vec<Stmt>,
}

impl Body {
    /// Locals returned by `return` statements
    pub fn return_locals(&self) -> impl Iterator<Item = LocalId> + '_ {
        self.stmts.iter().filter_map(|stmt| match stmt {
            Stmt::Return { value } => *value,
            _ => None,
        })
    }

    pub fn local(&self, id: LocalId) -> Option<&Local> {
        self.locals.get(id as usize)
    }

    pub fn local_id(&self, name: &str) -> Option<LocalId> {
        self.locals
            .iter()
            .position(|l| l.name == name)
            .map(|i| i as LocalId)
    }
}

/// Method or free function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub signature: MethodSignature,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: Type,
    /// `None` marks an opaque (SDK) method
    #[serde(default)]
    pub body: Option<Body>,
}

impl Method {
    /// Body absent: platform/SDK function
    pub fn is_opaque(&self) -> bool {
        self.body.is_none()
    }
}

/// Serialized program as produced by a front-end
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramDecl {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub entry_points: Vec<MethodSignature>,
}

/// Validated, indexed program
#[derive(Debug, Clone)]
pub struct Program {
    classes: FxHashMap<ClassSignature, ClassDecl>,
    methods: Vec<Method>,
    method_index: FxHashMap<MethodSignature, MethodId>,
    entry_points: Vec<MethodId>,
}

impl Program {
    /// Validate and index a declaration
    ///
    /// Rejects duplicate classes or method signatures, unknown entry points and
    /// bodies referring to locals they do not declare.
    pub fn from_decl(decl: ProgramDecl) -> Result<Self> {
        let mut classes = FxHashMap::default();
        for class in decl.classes {
            if classes.contains_key(&class.signature) {
                return Err(PtaError::ir(format!(
                    "duplicate class '{}'",
                    class.signature
                )));
            }
            classes.insert(class.signature.clone(), class);
        }

        let mut method_index = FxHashMap::default();
        for (id, method) in decl.methods.iter().enumerate() {
            if method_index
                .insert(method.signature.clone(), id as MethodId)
                .is_some()
            {
                return Err(PtaError::ir(format!(
                    "duplicate method '{}'",
                    method.signature
                )));
            }
            if let Some(body) = &method.body {
                validate_body(&method.signature, body)?;
            }
        }

        let mut entry_points = Vec::with_capacity(decl.entry_points.len());
        for sig in &decl.entry_points {
            let id = method_index
                .get(sig)
                .copied()
                .ok_or_else(|| PtaError::ir(format!("unknown entry point '{}'", sig)))?;
            entry_points.push(id);
        }

        for class in classes.values() {
            if let Some(sup) = &class.super_class {
                if !classes.contains_key(sup) {
                    debug!(class = %class.signature, super_class = %sup, "super class not declared");
                }
            }
        }

        info!(
            classes = classes.len(),
            methods = decl.methods.len(),
            entry_points = entry_points.len(),
            "Program indexed"
        );

        Ok(Self {
            classes,
            methods: decl.methods,
            method_index,
            entry_points,
        })
    }

    /// Parse a JSON [`ProgramDecl`]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let decl: ProgramDecl = serde_json::from_str(json)?;
        Self::from_decl(decl)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn method(&self, id: MethodId) -> Option<&Method> {
        self.methods.get(id as usize)
    }

    pub fn method_id(&self, sig: &MethodSignature) -> Option<MethodId> {
        self.method_index.get(sig).copied()
    }

    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &Method)> {
        self.methods
            .iter()
            .enumerate()
            .map(|(i, m)| (i as MethodId, m))
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn entry_points(&self) -> &[MethodId] {
        &self.entry_points
    }

    pub fn class(&self, sig: &ClassSignature) -> Option<&ClassDecl> {
        self.classes.get(sig)
    }

    pub fn has_class(&self, sig: &ClassSignature) -> bool {
        self.classes.contains_key(sig)
    }

    pub fn super_class(&self, sig: &ClassSignature) -> Option<&ClassSignature> {
        self.classes.get(sig).and_then(|c| c.super_class.as_ref())
    }

    /// `sub` equals `sup` or inherits from it
    pub fn is_subclass_of(&self, sub: &ClassSignature, sup: &ClassSignature) -> bool {
        self.superclass_chain(sub).any(|c| c == sup)
    }

    /// Virtual dispatch: the first class on `class`'s super chain declaring `name`
    pub fn dispatch(&self, class: &ClassSignature, name: &str) -> Option<MethodId> {
        self.superclass_chain(class).find_map(|c| {
            self.method_index
                .get(&MethodSignature {
                    class: c.clone(),
                    name: name.to_string(),
                })
                .copied()
        })
    }

    /// Property identity of `field`, independent of the class it is spelled through
    ///
    /// Resolves to the furthest ancestor of `field.class` declaring the name,
    /// or to the root of the chain when no class declares it. `B.f` and
    /// `S.f` with `S extends B` therefore name the same slot.
    pub fn canonical_field(&self, field: &FieldSignature) -> FieldSignature {
        let mut root = &field.class;
        let mut declaring = None;
        for class in self.superclass_chain(&field.class) {
            root = class;
            if self.class(class).is_some_and(|c| c.fields.iter().any(|f| f.name == field.name)) {
                declaring = Some(class);
            }
        }
        FieldSignature {
            class: declaring.unwrap_or(root).clone(),
            name: field.name.clone(),
        }
    }

    /// `class` followed by its ancestors; stops on inheritance cycles
    fn superclass_chain<'a>(
        &'a self,
        class: &'a ClassSignature,
    ) -> impl Iterator<Item = &'a ClassSignature> + 'a {
        let limit = self.classes.len() + 1;
        std::iter::successors(Some(class), move |c| self.super_class(c)).take(limit)
    }

    pub fn stmt(&self, stmt: StmtRef) -> Option<&Stmt> {
        self.method(stmt.method)
            .and_then(|m| m.body.as_ref())
            .and_then(|b| b.stmts.get(stmt.index as usize))
    }

    pub fn local_name(&self, method: MethodId, local: LocalId) -> Option<&str> {
        self.method(method)
            .and_then(|m| m.body.as_ref())
            .and_then(|b| b.local(local))
            .map(|l| l.name.as_str())
    }

    /// Look up a local by method signature and local name
    pub fn find_local(&self, method: &MethodSignature, name: &str) -> Option<(MethodId, LocalId)> {
        let id = self.method_id(method)?;
        let local = self.method(id)?.body.as_ref()?.local_id(name)?;
        Some((id, local))
    }

    /// Copy of this program with a different entry set
    pub fn with_entry_points(&self, entries: &[MethodId]) -> Result<Program> {
        if let Some(bad) = entries.iter().find(|&&m| self.method(m).is_none()) {
            return Err(PtaError::ir(format!("unknown entry point id {}", bad)));
        }
        Ok(Program {
            entry_points: entries.to_vec(),
            ..self.clone()
        })
    }
}

fn validate_body(sig: &MethodSignature, body: &Body) -> Result<()> {
    let count = body.locals.len() as LocalId;
    let check = |local: LocalId, what: &str| -> Result<()> {
        if local >= count {
            return Err(PtaError::ir(format!(
                "{}: {} refers to local {} but only {} are declared",
                sig, what, local, count
            )));
        }
        Ok(())
    };

    if let Some(this) = body.this_local {
        check(this, "this binding")?;
    }
    for &param in &body.param_locals {
        check(param, "parameter binding")?;
    }
    for (index, stmt) in body.stmts.iter().enumerate() {
        for local in stmt.all_locals() {
            check(local, &format!("statement {}", index))?;
        }
    }
    Ok(())
}
