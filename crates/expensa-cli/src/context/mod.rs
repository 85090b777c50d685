mod app_context;

pub use app_context::AppContext;

#[cfg(test)]
pub use app_context::test_support;
