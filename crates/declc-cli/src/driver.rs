//! Compilation driver: declaration documents in, headers out.

use crate::args::CliArgs;
use crate::model::{DeclDoc, ModuleDoc, TypeDoc, VisibilityDoc};
use anyhow::{Context, Result};
use declc_emitter::HeaderEmitter;
use declc_graph::{
    ClassDecl, CompoundOp, DeclArena, DeclFlags, DeclId, DeclKind, Declaration, FunctionDecl,
    Param, Qualifier, ResolverOptions, Target, TypeAliasDecl, TypeId, TypeInterner, VariableDecl,
    Visibility, remove_duplicates,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fs;
use tracing::{debug, info};

/// The arena, type registry and target list compiled from a document.
pub struct CompiledModule {
    pub arena: DeclArena,
    pub types: TypeInterner,
    pub targets: Vec<Target>,
}

/// Compile a document into declarations, types and targets.
///
/// Two passes: the first allocates every declaration and records its dotted
/// path, the second builds type expressions against the finished name table,
/// so references may point forward freely. The target list covers
/// namespace-scope declarations and classes (nested ones included); class
/// members are reached through their class's body, not as targets.
pub fn compile_document(doc: &ModuleDoc) -> CompiledModule {
    let mut builder = ModuleBuilder::new();
    builder.declare_all(&doc.declarations, None, "");
    builder.fill_types();
    let ModuleBuilder {
        arena,
        types,
        order,
        ..
    } = builder;
    let targets = order
        .iter()
        .map(|&decl| Target::new(decl, arena.max_state(decl)))
        .collect();
    CompiledModule {
        arena,
        types,
        targets,
    }
}

/// Compile a document all the way to header text.
pub fn compile_to_header(doc: &ModuleDoc, options: ResolverOptions) -> Result<String> {
    let module = compile_document(doc);
    let targets = remove_duplicates(&module.arena, module.targets);
    info!(targets = targets.len(), "resolving declaration targets");
    let header = HeaderEmitter::new(&module.arena, &module.types)
        .emit_header(&targets, options)
        .context("failed to lay out declarations")?;
    Ok(header)
}

/// Entry point for the `declc` binary.
pub fn run(args: &CliArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let doc: ModuleDoc = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    // Start from the defaults so the legacy process-wide switch still
    // applies, then layer the CLI flag on top.
    let mut options = ResolverOptions::default();
    if args.ignore_errors {
        options.ignore_errors = true;
    }
    let header = compile_to_header(&doc, options)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &header)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(output = %path.display(), "header written");
        }
        None => print!("{header}"),
    }
    Ok(())
}

struct ModuleBuilder<'doc> {
    arena: DeclArena,
    types: TypeInterner,
    by_path: FxHashMap<String, DeclId>,
    by_name: FxHashMap<String, DeclId>,
    pending: Vec<(DeclId, &'doc DeclDoc)>,
    order: Vec<DeclId>,
}

impl<'doc> ModuleBuilder<'doc> {
    fn new() -> Self {
        Self {
            arena: DeclArena::new(),
            types: TypeInterner::new(),
            by_path: FxHashMap::default(),
            by_name: FxHashMap::default(),
            pending: Vec::new(),
            order: Vec::new(),
        }
    }

    fn declare_all(&mut self, docs: &'doc [DeclDoc], parent: Option<DeclId>, prefix: &str) {
        for doc in docs {
            self.declare(doc, parent, prefix, Visibility::Public);
        }
    }

    fn declare(
        &mut self,
        doc: &'doc DeclDoc,
        parent: Option<DeclId>,
        prefix: &str,
        visibility: Visibility,
    ) -> DeclId {
        let name = doc.name();
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        let atom = self.types.intern_name(name);

        // Kind shells first; type expressions are filled in pass two.
        let kind = match doc {
            DeclDoc::Namespace { .. } => DeclKind::Namespace,
            DeclDoc::Class { type_params, .. } => DeclKind::Class(ClassDecl {
                bases: Vec::new(),
                type_params: self.intern_params(type_params),
                constraint: None,
            }),
            DeclDoc::Function { type_params, .. } => DeclKind::Function(FunctionDecl {
                ret: self.placeholder(),
                params: SmallVec::new(),
                type_params: self.intern_params(type_params),
                constraint: None,
            }),
            DeclDoc::Variable { .. } => DeclKind::Variable(VariableDecl {
                ty: self.placeholder(),
            }),
            DeclDoc::TypeAlias { type_params, .. } => DeclKind::TypeAlias(TypeAliasDecl {
                ty: self.placeholder(),
                type_params: self.intern_params(type_params),
            }),
        };

        let mut declaration = Declaration::new(atom, kind);
        declaration.visibility = visibility;
        let id = self.arena.alloc(declaration);
        if let Some(parent) = parent {
            self.arena.add_child(parent, id);
        }
        self.by_path.insert(path.clone(), id);
        self.by_name.entry(name.to_string()).or_insert(id);
        // Targets model what gets laid out at file scope, not everything the
        // builder allocates. Class members print inline with their class
        // body and are never resolver targets; nested classes are the
        // exception, since their definitions are emitted out of line.
        let class_member = parent
            .is_some_and(|p| matches!(self.arena.get(p).kind, DeclKind::Class(_)));
        if !class_member || matches!(doc, DeclDoc::Class { .. }) {
            self.order.push(id);
        }
        debug!(path = %path, "declared");

        match doc {
            DeclDoc::Namespace { declarations, .. } => {
                self.declare_all(declarations, Some(id), &path);
            }
            DeclDoc::Class {
                members, attributes, ..
            } => {
                for attribute in attributes {
                    let attribute = self.types.intern_name(attribute);
                    self.arena.add_attribute(id, attribute);
                }
                for member in members {
                    let member_visibility = match member.visibility {
                        VisibilityDoc::Public => Visibility::Public,
                        VisibilityDoc::Protected => Visibility::Protected,
                        VisibilityDoc::Private => Visibility::Private,
                    };
                    self.declare(&member.decl, Some(id), &path, member_visibility);
                }
                self.pending.push((id, doc));
            }
            DeclDoc::Variable { r#static, .. } => {
                let namespace_scope = parent
                    .is_none_or(|p| matches!(self.arena.get(p).kind, DeclKind::Namespace));
                if *r#static {
                    self.arena.add_flags(id, DeclFlags::STATIC);
                } else if namespace_scope {
                    self.arena.add_flags(id, DeclFlags::EXTERN);
                }
                self.pending.push((id, doc));
            }
            DeclDoc::Function { attributes, .. } => {
                for attribute in attributes {
                    let attribute = self.types.intern_name(attribute);
                    self.arena.add_attribute(id, attribute);
                }
                self.pending.push((id, doc));
            }
            DeclDoc::TypeAlias { .. } => {
                self.pending.push((id, doc));
            }
        }
        id
    }

    fn placeholder(&self) -> TypeId {
        self.types.named("void")
    }

    fn intern_params(&self, type_params: &[String]) -> Vec<declc_common::Atom> {
        type_params
            .iter()
            .map(|param| self.types.intern_name(param))
            .collect()
    }

    fn fill_types(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for (id, doc) in pending {
            match doc {
                DeclDoc::Class {
                    bases, constraint, ..
                } => {
                    let bases = bases
                        .iter()
                        .map(|base| self.build_type(base))
                        .collect::<Vec<_>>();
                    let constraint = constraint.as_ref().map(|c| self.build_type(c));
                    if let DeclKind::Class(class) = &mut self.arena.get_mut(id).kind {
                        class.bases = bases;
                        class.constraint = constraint;
                    }
                }
                DeclDoc::Function {
                    returns,
                    params,
                    constraint,
                    ..
                } => {
                    let ret = self.build_type(returns);
                    let params = params
                        .iter()
                        .map(|param| Param {
                            name: self.types.intern_name(&param.name),
                            ty: self.build_type(&param.ty),
                        })
                        .collect::<SmallVec<_>>();
                    let constraint = constraint.as_ref().map(|c| self.build_type(c));
                    if let DeclKind::Function(function) = &mut self.arena.get_mut(id).kind {
                        function.ret = ret;
                        function.params = params;
                        function.constraint = constraint;
                    }
                }
                DeclDoc::Variable { ty, .. } => {
                    let ty = self.build_type(ty);
                    if let DeclKind::Variable(variable) = &mut self.arena.get_mut(id).kind {
                        variable.ty = ty;
                    }
                }
                DeclDoc::TypeAlias { ty, .. } => {
                    let ty = self.build_type(ty);
                    if let DeclKind::TypeAlias(alias) = &mut self.arena.get_mut(id).kind {
                        alias.ty = ty;
                    }
                }
                DeclDoc::Namespace { .. } => {}
            }
        }
    }

    fn build_type(&self, doc: &TypeDoc) -> TypeId {
        match doc {
            TypeDoc::Named(name) => self.types.named(name),
            TypeDoc::Generic(name) => self.types.generic(name),
            TypeDoc::Literal(token) => self.types.literal(token),
            TypeDoc::Ref(path) => match self.lookup(path) {
                Some(decl) => self.types.declared(decl),
                // Unknown referents are assumed to come from an external
                // header; spell the dotted path as a plain qualified name.
                None => self.types.named(&path.replace('.', "::")),
            },
            TypeDoc::Pointer(inner) => self
                .types
                .qualified(Qualifier::Pointer, self.build_type(inner)),
            TypeDoc::Reference(inner) => self
                .types
                .qualified(Qualifier::Reference, self.build_type(inner)),
            TypeDoc::ConstPointer(inner) => self
                .types
                .qualified(Qualifier::ConstPointer, self.build_type(inner)),
            TypeDoc::ConstReference(inner) => self
                .types
                .qualified(Qualifier::ConstReference, self.build_type(inner)),
            TypeDoc::Function { returns, params } => {
                let ret = self.build_type(returns);
                let params = params
                    .iter()
                    .map(|param| self.build_type(param))
                    .collect::<Vec<_>>();
                self.types.function(ret, &params)
            }
            TypeDoc::Member { inner, name } => {
                self.types.member(self.build_type(inner), name)
            }
            TypeDoc::AllOf(operands) => self.build_compound(CompoundOp::And, operands),
            TypeDoc::AnyOf(operands) => self.build_compound(CompoundOp::Or, operands),
        }
    }

    fn build_compound(&self, op: CompoundOp, operands: &[TypeDoc]) -> TypeId {
        let operands = operands
            .iter()
            .map(|operand| self.build_type(operand))
            .collect::<Vec<_>>();
        self.types.compound(op, &operands)
    }

    fn lookup(&self, path: &str) -> Option<DeclId> {
        self.by_path
            .get(path)
            .or_else(|| self.by_name.get(path))
            .copied()
    }
}
