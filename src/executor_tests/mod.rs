mod deferred;
mod directives;
mod executor;
mod lists;
mod variables;
