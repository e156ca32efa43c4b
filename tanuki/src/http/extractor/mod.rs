mod signed_activity;

pub use self::signed_activity::SignedActivity;
