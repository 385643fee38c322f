use crate::context::Context;
use crate::error::EngineError;
use crate::node::{is_leaf, make_node, verified_kids, Node};
use crate::rule::{run_pipeline, Outcome};

/// Safety net against a rule-contract bug: a rule that never settles on
/// `Accepted` would otherwise loop forever.
const MAX_CHILD_ITERATIONS: usize = 1000;
/// The root may run at most twice: once initially, once more after a single
/// tolerated replacement.
const MAX_ROOT_ITERATIONS: usize = 2;

/// Dispatches `node` to the rule pipeline, then (for composite kinds)
/// recurses.
pub fn format_node(ctx: &mut Context, node: &Node) -> Result<Outcome, EngineError> {
  // Swap the pipeline out so rules can be run with `ctx` mutably borrowed;
  // the engine core has no other way to call back into `ctx` while also
  // holding `ctx.rules` immutably.
  let rules = std::mem::take(&mut ctx.rules);
  let outcome = run_pipeline(&rules, ctx, node);
  ctx.rules = rules;

  if !matches!(outcome, Outcome::Accepted) {
    return Ok(outcome);
  }

  let kind = node.kind();
  if kind.is_always_recursive() {
    return format_node_with_kids(ctx, node);
  }
  if kind.is_conditionally_recursive() {
    if is_leaf(node) {
      return accept_terminal(ctx, node);
    }
    return format_node_with_kids(ctx, node);
  }
  if kind.is_terminal_or_trivia() {
    return accept_terminal(ctx, node);
  }

  Err(EngineError::UnhandledKind {
    kind,
    cursor: ctx.fmt_io().cursor(),
    partial: ctx.fmt_io().as_bytes().to_vec(),
  })
}

fn accept_terminal(ctx: &mut Context, node: &Node) -> Result<Outcome, EngineError> {
  ctx.fmt_io_mut().advance(node.span());
  Ok(Outcome::Accepted)
}

/// Iterates children with sibling context, re-running each child to a fixed
/// point, and produces a new parent node if any child changed.
pub fn format_node_with_kids(ctx: &mut Context, node: &Node) -> Result<Outcome, EngineError> {
  let kids = verified_kids(node).to_vec();

  let saved_prev = ctx.prev_sibling.take();
  let saved_next = ctx.next_sibling.take();

  let mut formatted: Vec<Node> = Vec::with_capacity(kids.len());
  let mut changed = false;

  for (i, original_kid) in kids.iter().enumerate() {
    ctx.prev_sibling = formatted.last().cloned();
    ctx.next_sibling = kids.get(i + 1).cloned();

    let mut kid = original_kid.clone();
    let mut iterations = 0usize;
    loop {
      let fmt_pos = ctx.fmt_io().cursor();
      match format_node(ctx, &kid)? {
        Outcome::Accepted => {
          if ctx.flags.assert && ctx.fmt_io().cursor() != fmt_pos + kid.span() {
            return Err(EngineError::Assertion {
              message: format!(
                "cursor {} did not advance by span {} from {fmt_pos}",
                ctx.fmt_io().cursor(),
                kid.span()
              ),
            });
          }
          break;
        }
        Outcome::Replaced(new_kid) => {
          ctx.fmt_io_mut().rewind(fmt_pos);
          kid = new_kid;
          changed = true;
        }
        Outcome::Deleted => return Err(EngineError::DeletedVariant),
      }
      iterations += 1;
      if iterations >= MAX_CHILD_ITERATIONS {
        return Err(EngineError::Convergence {
          iterations,
          cursor: ctx.fmt_io().cursor(),
        });
      }
    }
    formatted.push(kid);
  }

  ctx.prev_sibling = saved_prev;
  ctx.next_sibling = saved_next;

  if changed {
    Ok(Outcome::Replaced(make_node(node, formatted, node.tags)))
  } else {
    Ok(Outcome::Accepted)
  }
}

/// Seeds the output buffer with the source, invokes the node driver on the
/// root, enforces at-most-once root mutation, and truncates.
pub fn format_tree(ctx: &mut Context) -> Result<(), EngineError> {
  let seed: Vec<u8> = ctx.src_io().as_bytes().to_vec();
  ctx.fmt_io_mut().seed(&seed);

  let mut root = ctx.src_tree().clone();
  let mut iterations = 0usize;
  loop {
    ctx.fmt_io_mut().rewind(0);
    match format_node(ctx, &root)? {
      Outcome::Accepted => {
        if ctx.flags.assert && ctx.fmt_io().cursor() != root.span() {
          return Err(EngineError::Assertion {
            message: format!(
              "root cursor {} did not advance by span {}",
              ctx.fmt_io().cursor(),
              root.span()
            ),
          });
        }
        break;
      }
      Outcome::Replaced(new_root) => {
        iterations += 1;
        if iterations >= MAX_ROOT_ITERATIONS {
          return Err(EngineError::RootModifiedTwice);
        }
        root = new_root;
        continue;
      }
      Outcome::Deleted => return Err(EngineError::RootDeletion),
    }
  }

  ctx.fmt_io_mut().truncate(root.span());
  ctx.fmt_tree = Some(root);
  Ok(())
}
