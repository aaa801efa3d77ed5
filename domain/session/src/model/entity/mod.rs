mod session;

#[rustfmt::skip]
pub use {
    session::Session,
    session::SessionUser,
};
