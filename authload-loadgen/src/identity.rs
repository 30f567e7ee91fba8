use authload_common::{Credentials, Target};

/// Generate `count` synthetic accounts for `target`, index `0..count`.
///
/// Account `i` is `<prefix>_user_<i>@example.com` with password
/// `TestPassword!<i>` (index zero-padded to three digits).
pub fn generate_identities(target: Target, count: usize) -> Vec<Credentials> {
    let prefix = target.user_prefix();
    (0..count)
        .map(|idx| Credentials {
            email: format!("{prefix}_user_{idx}@example.com"),
            password: format!("TestPassword!{idx:03}"),
        })
        .collect()
}

/// The identity assigned to the worker at spawn index `worker_idx`.
pub fn identity_for_worker(identities: &[Credentials], worker_idx: usize) -> Option<&Credentials> {
    if identities.is_empty() {
        return None;
    }
    identities.get(worker_idx % identities.len())
}
