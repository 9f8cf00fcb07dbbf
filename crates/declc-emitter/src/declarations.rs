//! Partial and complete rendering per declaration kind.

use crate::source_writer::SourceWriter;
use crate::type_printer::TypePrinter;
use declc_common::Atom;
use declc_graph::{
    DeclArena, DeclFlags, DeclId, DeclKind, State, TypeInterner, Visibility,
};
use tracing::debug;

/// Carries the resolution state an emit call is running under, so rendering
/// code can branch between partial and complete output.
#[derive(Clone, Copy, Debug)]
pub struct ResolverContext {
    pub state: State,
}

impl ResolverContext {
    #[must_use]
    pub const fn new(state: State) -> Self {
        Self { state }
    }
}

/// Renders declarations into a [`SourceWriter`].
///
/// Partial emission produces the forward form (`class A;`, `extern T v;`, a
/// function prototype); complete emission produces the definition. Nested
/// classes are forward-declared inside their enclosing body and defined out
/// of line under their qualified name.
pub struct DeclarationEmitter<'a> {
    arena: &'a DeclArena,
    types: &'a TypeInterner,
    writer: SourceWriter,
}

impl<'a> DeclarationEmitter<'a> {
    #[must_use]
    pub fn new(arena: &'a DeclArena, types: &'a TypeInterner) -> Self {
        Self {
            arena,
            types,
            writer: SourceWriter::new(),
        }
    }

    fn printer(&self) -> TypePrinter<'a> {
        TypePrinter::new(self.arena, self.types)
    }

    pub fn writer(&mut self) -> &mut SourceWriter {
        &mut self.writer
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.writer.finish()
    }

    /// Whether emitting `decl` at `state` writes any text. Namespaces write
    /// nothing themselves, and a nested class's forward declaration already
    /// sits inside its enclosing body.
    #[must_use]
    pub fn writes_output(&self, decl: DeclId, state: State) -> bool {
        match self.arena.get(decl).kind {
            DeclKind::Namespace => false,
            DeclKind::Class(_) => {
                state == State::Complete || !self.printer().nested_in_class(decl)
            }
            _ => true,
        }
    }

    pub fn emit(&mut self, ctx: &ResolverContext, decl: DeclId, ns: Option<DeclId>) {
        debug!(
            decl = %self.arena.qualified_name(self.types.atoms(), decl),
            state = ?ctx.state,
            "emit declaration"
        );
        match ctx.state {
            State::Partial => self.emit_partial(decl, ns),
            State::Complete => self.emit_complete(decl, ns),
        }
    }

    fn emit_partial(&mut self, decl: DeclId, ns: Option<DeclId>) {
        let declaration = self.arena.get(decl);
        match &declaration.kind {
            DeclKind::Namespace => {}
            DeclKind::Class(class) => {
                if self.printer().nested_in_class(decl) {
                    return;
                }
                self.template_head(&class.type_params);
                let name = self.printer().qualified_path(decl, ns);
                let attributes = self.attribute_prefix(decl);
                self.writer.write_line(&format!("class {attributes}{name};"));
            }
            DeclKind::Function(_) => self.emit_function(decl, ns),
            DeclKind::Variable(_) => self.emit_variable(decl, ns),
            DeclKind::TypeAlias(_) => self.emit_alias(decl, ns),
        }
    }

    fn emit_complete(&mut self, decl: DeclId, ns: Option<DeclId>) {
        let declaration = self.arena.get(decl);
        match &declaration.kind {
            DeclKind::Namespace => {}
            DeclKind::Class(_) => self.emit_class_definition(decl, ns),
            // Functions and variables max out at Partial; an alias has no
            // body to elide, so both forms render the same line.
            DeclKind::Function(_) => self.emit_function(decl, ns),
            DeclKind::Variable(_) => self.emit_variable(decl, ns),
            DeclKind::TypeAlias(_) => self.emit_alias(decl, ns),
        }
    }

    fn emit_class_definition(&mut self, decl: DeclId, ns: Option<DeclId>) {
        let declaration = self.arena.get(decl);
        let DeclKind::Class(class) = &declaration.kind else {
            return;
        };
        self.template_head(&class.type_params);

        let printer = self.printer();
        let name = printer.qualified_path(decl, ns);
        let mut line = format!("class {}{name}", self.attribute_prefix(decl));
        if !class.bases.is_empty() {
            let bases = class
                .bases
                .iter()
                .map(|&base| format!("public {}", printer.print(base, ns)))
                .collect::<Vec<_>>()
                .join(", ");
            line.push_str(&format!(": {bases}"));
        }
        line.push_str(" {");
        self.writer.write_line(&line);

        let mut visibility = None;
        for &child in &declaration.children {
            let child_visibility = self.arena.get(child).visibility;
            if visibility != Some(child_visibility) {
                let label = match child_visibility {
                    Visibility::Public => "public:",
                    Visibility::Protected => "protected:",
                    Visibility::Private => "private:",
                };
                self.writer.write_line(label);
                visibility = Some(child_visibility);
            }
            self.writer.indent();
            self.emit_member(child, ns);
            self.writer.dedent();
        }
        self.writer.write_line("};");
    }

    fn emit_member(&mut self, decl: DeclId, ns: Option<DeclId>) {
        let declaration = self.arena.get(decl);
        match &declaration.kind {
            // A nested class contributes its forward declaration to the
            // body; the definition follows out of line.
            DeclKind::Class(_) => {
                let name = self.types.atoms().resolve(declaration.name).to_string();
                self.writer.write_line(&format!("class {name};"));
            }
            DeclKind::Function(_) => self.emit_function(decl, ns),
            DeclKind::Variable(_) => self.emit_variable(decl, ns),
            DeclKind::TypeAlias(_) => self.emit_alias(decl, ns),
            DeclKind::Namespace => {}
        }
    }

    fn emit_function(&mut self, decl: DeclId, ns: Option<DeclId>) {
        let declaration = self.arena.get(decl);
        let DeclKind::Function(function) = &declaration.kind else {
            return;
        };
        self.template_head(&function.type_params);
        let attributes = self.attribute_prefix(decl);
        let printer = self.printer();
        let name = self.types.atoms().resolve(declaration.name);
        let params = function
            .params
            .iter()
            .map(|param| {
                format!(
                    "{} {}",
                    printer.print(param.ty, ns),
                    self.types.atoms().resolve(param.name)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let line = format!(
            "{attributes}{} {name}({params});",
            printer.print(function.ret, ns)
        );
        self.writer.write_line(&line);
    }

    fn emit_variable(&mut self, decl: DeclId, ns: Option<DeclId>) {
        let declaration = self.arena.get(decl);
        let DeclKind::Variable(variable) = &declaration.kind else {
            return;
        };
        let mut line = String::new();
        if declaration.flags.contains(DeclFlags::STATIC) {
            line.push_str("static ");
        } else if declaration.flags.contains(DeclFlags::EXTERN) {
            line.push_str("extern ");
        }
        let name = self.types.atoms().resolve(declaration.name);
        line.push_str(&format!(
            "{} {name};",
            self.printer().print(variable.ty, ns)
        ));
        self.writer.write_line(&line);
    }

    fn emit_alias(&mut self, decl: DeclId, ns: Option<DeclId>) {
        let declaration = self.arena.get(decl);
        let DeclKind::TypeAlias(alias) = &declaration.kind else {
            return;
        };
        self.template_head(&alias.type_params);
        let name = self.types.atoms().resolve(declaration.name);
        self.writer.write_line(&format!(
            "using {name} = {};",
            self.printer().print(alias.ty, ns)
        ));
    }

    /// `[[...]]` attribute tokens, rendered verbatim with a trailing space.
    fn attribute_prefix(&self, decl: DeclId) -> String {
        let declaration = self.arena.get(decl);
        let mut prefix = String::new();
        for &attribute in &declaration.attributes {
            prefix.push_str(&format!("[[{}]] ", self.types.atoms().resolve(attribute)));
        }
        prefix
    }

    fn template_head(&mut self, type_params: &[Atom]) {
        if type_params.is_empty() {
            return;
        }
        let params = type_params
            .iter()
            .map(|&param| format!("class {}", self.types.atoms().resolve(param)))
            .collect::<Vec<_>>()
            .join(", ");
        self.writer.write_line(&format!("template<{params}>"));
    }
}
