//! HTTP handlers for the products resource.
//!
//! Form-encoded bodies, query-string parameters. The collection lives at
//! `/` and is keyed by name; `/id/{id}` addresses the same records by
//! primary key.

use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    Form,
};
use serde::Deserialize;

use catalog_http::error::AppError;
use catalog_http::response;
use catalog_kernel::Db;

use super::models::Product;

const RESOURCE: &str = "products";

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameForm {
    pub name: Option<String>,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn name_not_found(name: &str) -> AppError {
    AppError::not_found(format!("product [{name}] does not exist"))
}

fn id_not_found(raw: &str) -> AppError {
    AppError::not_found(format!("id [{raw}] does not exist"))
}

/// Pull a non-empty `name` out of a form body. Extraction failures (wrong
/// or absent content-type, unparseable body) count the same as a missing
/// field, so they surface as the usual 400 envelope.
fn form_name(body: Result<Form<NameForm>, FormRejection>) -> Option<String> {
    body.ok()
        .and_then(|Form(form)| form.name)
        .filter(|n| !n.is_empty())
}

/// Query-string names are optional; an empty value counts as absent.
fn query_name(query: NameQuery) -> Option<String> {
    query.name.filter(|n| !n.is_empty())
}

/// `POST /` — create a product from the form `name`, rejecting duplicates
/// case-insensitively. The check-then-insert runs in one transaction and
/// the UNIQUE column backstops races.
pub async fn create_product(
    State(db): State<Db>,
    body: Result<Form<NameForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Some(name) = form_name(body) else {
        return Err(AppError::invalid_request("invalid request"));
    };

    let mut tx = db.begin().await?;
    if Product::find_by_name(&mut *tx, &name).await?.is_some() {
        return Err(AppError::conflict("product already exists"));
    }
    let product = match Product::insert(&mut *tx, &name).await {
        Ok(product) => product,
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::conflict("product already exists"));
        }
        Err(err) => return Err(err.into()),
    };
    tx.commit().await?;

    Ok(response::success(
        RESOURCE,
        vec![product],
        "product has been added",
        StatusCode::CREATED,
    ))
}

/// `GET /` — list every product, or look one up by `?name=` (exact,
/// case-insensitive).
pub async fn get_products(
    State(db): State<Db>,
    Query(query): Query<NameQuery>,
) -> Result<Response, AppError> {
    match query_name(query) {
        Some(name) => {
            let product = Product::find_by_name(&db, &name)
                .await?
                .ok_or_else(|| name_not_found(&name))?;
            Ok(response::success(
                RESOURCE,
                vec![product],
                "product retrieved successfully",
                StatusCode::OK,
            ))
        }
        None => {
            let products = Product::list_all(&db).await?;
            Ok(response::success(
                RESOURCE,
                products,
                "products retrieved successfully",
                StatusCode::OK,
            ))
        }
    }
}

/// `PUT /` — rename the product identified by the query `name` to the form
/// `name`, provided the new name is not already taken.
pub async fn rename_product(
    State(db): State<Db>,
    Query(query): Query<NameQuery>,
    body: Result<Form<NameForm>, FormRejection>,
) -> Result<Response, AppError> {
    let (Some(target), Some(new_name)) = (query_name(query), form_name(body)) else {
        return Err(AppError::invalid_request("invalid request"));
    };

    let mut tx = db.begin().await?;
    let product = Product::find_by_name(&mut *tx, &target)
        .await?
        .ok_or_else(|| name_not_found(&target))?;
    if Product::find_by_name(&mut *tx, &new_name).await?.is_some() {
        return Err(AppError::conflict(format!(
            "product [{new_name}] already exists"
        )));
    }
    let product = Product::rename(&mut *tx, product.id, &new_name).await?;
    tx.commit().await?;

    Ok(response::success(
        RESOURCE,
        vec![product],
        "product has been updated",
        StatusCode::OK,
    ))
}

/// `DELETE /` — delete the product identified by the query `name`.
pub async fn delete_product(
    State(db): State<Db>,
    Query(query): Query<NameQuery>,
) -> Result<Response, AppError> {
    let Some(name) = query_name(query) else {
        return Err(AppError::invalid_request("invalid request"));
    };

    let mut tx = db.begin().await?;
    let product = Product::find_by_name(&mut *tx, &name)
        .await?
        .ok_or_else(|| name_not_found(&name))?;
    Product::delete(&mut *tx, product.id).await?;
    tx.commit().await?;

    Ok(response::no_content())
}

/// Resolve a raw path id to a stored product. Non-numeric ids fall out as
/// 404 like unknown ones; the stricter 400 rule applies to books only.
async fn product_for_raw_id(db: &Db, raw: &str) -> Result<Product, AppError> {
    let id: i64 = raw.parse().map_err(|_| id_not_found(raw))?;
    Product::find_by_id(db, id)
        .await?
        .ok_or_else(|| id_not_found(raw))
}

/// `GET /id/{id}`.
pub async fn get_product_by_id(
    State(db): State<Db>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let product = product_for_raw_id(&db, &raw_id).await?;
    Ok(response::success(
        RESOURCE,
        vec![product],
        "product retrieved successfully",
        StatusCode::OK,
    ))
}

/// `PUT /id/{id}` — rename by primary key; any product already holding the
/// new name (the target included) is a conflict.
pub async fn rename_product_by_id(
    State(db): State<Db>,
    Path(raw_id): Path<String>,
    body: Result<Form<NameForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Some(new_name) = form_name(body) else {
        return Err(AppError::invalid_request("invalid request"));
    };

    let mut tx = db.begin().await?;
    let id: i64 = raw_id.parse().map_err(|_| id_not_found(&raw_id))?;
    let product = Product::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| id_not_found(&raw_id))?;
    if Product::find_by_name(&mut *tx, &new_name).await?.is_some() {
        return Err(AppError::conflict(format!(
            "product [{new_name}] already exists"
        )));
    }
    let product = Product::rename(&mut *tx, product.id, &new_name).await?;
    tx.commit().await?;

    Ok(response::success(
        RESOURCE,
        vec![product],
        "product has been updated",
        StatusCode::OK,
    ))
}

/// `DELETE /id/{id}`.
pub async fn delete_product_by_id(
    State(db): State<Db>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let mut tx = db.begin().await?;
    let id: i64 = raw_id.parse().map_err(|_| id_not_found(&raw_id))?;
    let product = Product::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| id_not_found(&raw_id))?;
    Product::delete(&mut *tx, product.id).await?;
    tx.commit().await?;

    Ok(response::no_content())
}
