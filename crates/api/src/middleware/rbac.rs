//! Permission-based access control extractors.
//!
//! Each protected endpoint names the single permission action it requires
//! through a marker type from [`perm`]. The check runs against the claims in
//! the caller's token, so it never touches the database.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rbac_core::error::CoreError;
use rbac_core::permissions::grants;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// A permission action an endpoint requires.
pub trait RequiredPermission {
    const ACTION: &'static str;
}

/// Requires the permission `P`. Rejects with 401 without a valid token and
/// with 403 when the token lacks `P`.
///
/// ```ignore
/// async fn list_roles(
///     RequirePermission { user, .. }: RequirePermission<perm::GetRole>,
/// ) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePermission<P> {
    pub user: AuthUser,
    _permission: PhantomData<fn() -> P>,
}

impl<P> FromRequestParts<AppState> for RequirePermission<P>
where
    P: RequiredPermission,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !grants(&user.permissions, P::ACTION) {
            tracing::debug!(
                user_id = user.user_id,
                action = P::ACTION,
                "Permission denied"
            );
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Permission '{}' required",
                P::ACTION
            ))));
        }
        Ok(RequirePermission {
            user,
            _permission: PhantomData,
        })
    }
}

macro_rules! permission_markers {
    ($($name:ident => $action:path),* $(,)?) => {
        $(
            #[doc = concat!("Marker for the `", stringify!($name), "` permission.")]
            pub struct $name;

            impl super::RequiredPermission for $name {
                const ACTION: &'static str = $action;
            }
        )*
    };
}

/// Marker types, one per built-in permission action.
pub mod perm {
    use rbac_core::permissions as p;

    permission_markers! {
        CreateRole => p::CREATE_ROLE,
        GetRole => p::GET_ROLE,
        UpdateRole => p::UPDATE_ROLE,
        DeleteRole => p::DELETE_ROLE,
        CreatePermission => p::CREATE_PERMISSION,
        GetPermission => p::GET_PERMISSION,
        UpdatePermission => p::UPDATE_PERMISSION,
        DeletePermission => p::DELETE_PERMISSION,
        CreateUser => p::CREATE_USER,
        GetUser => p::GET_USER,
        UpdateUser => p::UPDATE_USER,
        DeleteUser => p::DELETE_USER,
    }
}
