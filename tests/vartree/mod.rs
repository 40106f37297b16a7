mod resolve_test;
mod scope_test;
mod update_test;
