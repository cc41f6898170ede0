//! Token listing.

use super::{Context, Outcome};

/// Lists every token known to the registry.
pub fn run(ctx: &Context) -> Outcome {
    Outcome::Tokens(ctx.registry.list())
}
