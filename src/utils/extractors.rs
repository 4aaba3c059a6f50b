use crate::{
    error::{AppError, Result},
    models::UserRole,
    utils::jwt::Claims,
};

pub fn extract_user_id(claims: &Claims) -> Result<i32> {
    claims
        .sub
        .parse::<i32>()
        .map_err(|_| AppError::Unauthorized("Unauthorized".to_string()))
}

pub fn extract_shop_id(claims: &Claims) -> Result<i32> {
    claims
        .shop_id
        .ok_or_else(|| AppError::Forbidden("No shop is linked to this account".to_string()))
}

/// Shop filter for dashboard lists: a seller always sees their own shop,
/// an admin sees their linked shop or, with none linked, every shop.
pub fn shop_scope(claims: &Claims) -> Result<Option<i32>> {
    match claims.role {
        UserRole::Admin => Ok(claims.shop_id),
        _ => extract_shop_id(claims).map(Some),
    }
}

/// Admins may act on any shop; sellers only on their own.
pub fn ensure_shop_access(claims: &Claims, shop_id: i32) -> Result<()> {
    if claims.role == UserRole::Admin || claims.shop_id == Some(shop_id) {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "This resource belongs to another shop".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: UserRole, shop_id: Option<i32>) -> Claims {
        Claims {
            sub: "12".to_string(),
            email: "seller@example.com".to_string(),
            name: "Seller".to_string(),
            role,
            shop_id,
            exp: usize::MAX,
        }
    }

    #[test]
    fn seller_is_limited_to_own_shop() {
        let seller = claims(UserRole::Seller, Some(4));

        assert!(ensure_shop_access(&seller, 4).is_ok());
        assert!(matches!(
            ensure_shop_access(&seller, 5),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_reaches_every_shop() {
        assert!(ensure_shop_access(&claims(UserRole::Admin, None), 99).is_ok());
    }

    #[test]
    fn dashboard_scope_depends_on_role() {
        assert_eq!(shop_scope(&claims(UserRole::Seller, Some(4))).unwrap(), Some(4));
        assert_eq!(shop_scope(&claims(UserRole::Admin, None)).unwrap(), None);
        assert!(shop_scope(&claims(UserRole::Seller, None)).is_err());
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let mut c = claims(UserRole::Customer, None);
        c.sub = "abc".to_string();

        assert!(matches!(extract_user_id(&c), Err(AppError::Unauthorized(_))));
        assert_eq!(extract_user_id(&claims(UserRole::Customer, None)).unwrap(), 12);
    }
}
