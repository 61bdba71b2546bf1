// ============================================================================
// eddy-reactive - Ergonomic Macros
// ============================================================================

/// Helper macro to clone variables into a move closure.
///
/// Reduces the boilerplate of manually cloning handle types (`Stream`,
/// `Behavior`, `Rc`, ...) before moving them into a closure.
///
/// # Usage
///
/// ```ignore
/// use eddy_reactive::cloned;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// events.subscribe(&scope, cloned!(seen => move |v| {
///     seen.borrow_mut().push(v.clone());
/// }));
///
/// seen.borrow(); // the original is still usable here
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}
