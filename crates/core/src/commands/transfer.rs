use crate::addressing::select;
use crate::apply::{ValueSource, apply_value};
use crate::policy::PutPolicy;
use jsonmorph_context::{ExecutionContext, ExecutionResult};
use jsonmorph_document::{Document, NodeId};
use jsonmorph_jpath::{SplitPath, normalize_address, render_elements};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    fn name(self) -> &'static str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        }
    }
}

/// Copies or moves the nodes matched by `from_path` to `to_path`.
#[derive(Debug, Clone)]
pub struct TransferCommand {
    pub mode: TransferMode,
    pub from_path: Option<String>,
    pub to_path: Option<String>,
}

impl TransferCommand {
    pub fn new(mode: TransferMode, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            mode,
            from_path: Some(from.into()),
            to_path: Some(to.into()),
        }
    }

    pub fn execute(&self, document: &mut Document, ctx: &ExecutionContext<'_>) -> ExecutionResult<()> {
        let name = self.mode.name();
        let (Some(from), Some(to)) = (non_blank(&self.from_path), non_blank(&self.to_path)) else {
            ctx.commands()
                .warn(format!("{}: 'fromPath' and 'toPath' are both required", name));
            return ExecutionResult::from_success(false);
        };
        let from = SplitPath::parse(&normalize_address(from));
        let to = SplitPath::parse(&normalize_address(to));
        let root = document.root();

        if to.is_root() {
            return self.replace_root(document, &from, ctx);
        }

        let Some(scope_len) = alignment_len(&from, &to) else {
            return self.transfer(document, root, &from.render(), &to.render(), ctx);
        };

        let scope_query = render_elements(&from.elements()[..scope_len]);
        let scopes = select(document, root, &scope_query, ctx);
        if scopes.is_empty() {
            ctx.commands()
                .warn(format!("{}: nothing matched '{}'", name, scope_query));
            return ExecutionResult::from_success(false);
        }
        let from_rel = from.relative_to(scope_len).render();
        let to_rel = to.relative_to(scope_len).render();
        log::debug!(
            "{} aligned on '{}': '{}' -> '{}' in {} scope(s)",
            name,
            scope_query,
            from_rel,
            to_rel,
            scopes.len()
        );

        let mut result = ExecutionResult::from_success(true);
        for scope in scopes {
            let outcome = self.transfer(document, scope, &from_rel, &to_rel, ctx);
            result = result.and(outcome.success);
        }
        result
    }

    /// Writes every source match into every target, relative to `origin`.
    fn transfer(
        &self,
        document: &mut Document,
        origin: NodeId,
        from: &str,
        to: &str,
        ctx: &ExecutionContext<'_>,
    ) -> ExecutionResult<()> {
        let sources = select(document, origin, from, ctx);
        if sources.is_empty() {
            ctx.commands()
                .warn(format!("{}: nothing matched '{}'", self.mode.name(), from));
            return ExecutionResult::from_success(false);
        }

        let mut success = true;
        for source in sources {
            let value = document.value(source);
            let written = apply_value(
                document,
                origin,
                to,
                ValueSource::Fixed(&value),
                &PutPolicy,
                ctx,
            );
            success &= written.success;
            // Writing over an ancestor of the source has already unlinked it.
            if written.success && self.mode == TransferMode::Move && document.is_attached(source) {
                if let Err(e) = document.detach(source) {
                    ctx.commands().warn(format!("move: {}", e));
                    success = false;
                }
            }
        }
        ExecutionResult::from_success(success)
    }

    /// `toPath` of `$`: a single object source becomes the whole document.
    fn replace_root(
        &self,
        document: &mut Document,
        from: &SplitPath,
        ctx: &ExecutionContext<'_>,
    ) -> ExecutionResult<()> {
        let name = self.mode.name();
        let root = document.root();
        let sources = select(document, root, &from.render(), ctx);
        let [source] = sources.as_slice() else {
            ctx.commands().warn(format!(
                "{}: replacing the root needs exactly one source, '{}' matched {}",
                name,
                from,
                sources.len()
            ));
            return ExecutionResult::from_success(false);
        };
        if !document.is_object(*source) {
            ctx.commands().warn(format!(
                "{}: '{}' is a {} value; only an object can replace the root",
                name,
                from,
                document.node_type(*source)
            ));
            return ExecutionResult::from_success(false);
        }
        let value = document.value(*source);
        document.replace(root, value);
        ctx.commands()
            .info(format!("{}: '{}' replaced the document root", name, from));
        ExecutionResult::from_success(true)
    }
}

fn non_blank(path: &Option<String>) -> Option<&str> {
    path.as_deref().filter(|p| !p.trim().is_empty())
}

/// Length of the shared leading run of elements that ends in an array step,
/// when both addresses continue past it.
fn alignment_len(from: &SplitPath, to: &SplitPath) -> Option<usize> {
    let common = from.common_prefix_len(to);
    let len = (1..=common)
        .rev()
        .find(|&k| from.elements()[k - 1].has_array_indicator())?;
    (len < from.len() && len < to.len()).then_some(len)
}
