use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use super::{create_access_token, hash_password, verify_password};
use crate::server::AppState;
use crate::store::StoredUser;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub fullname: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Register a new account with an argon2-hashed password.
pub async fn register(
    request: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> impl Responder {
    let request = request.into_inner();

    match state.db.find_user_by_email(&request.email) {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(json!({"error": "User already exists"}))
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("User lookup failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({"error": "Failed to register user"}));
        }
    }

    let password_hash = match hash_password(&request.password) {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("Password hashing failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({"error": "Failed to register user"}));
        }
    };

    let user = StoredUser {
        fullname: request.fullname,
        email: request.email,
        username: request.username,
        password_hash,
    };

    match state.db.insert_user(&user) {
        Ok(()) => HttpResponse::Ok().json(json!({"msg": "User created"})),
        Err(e) => {
            log::error!("User insert failed: {}", e);
            HttpResponse::BadRequest().json(json!({"error": "User already exists"}))
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Exchange email + password for a signed access token.
pub async fn login(request: web::Json<LoginRequest>, state: web::Data<AppState>) -> impl Responder {
    let request = request.into_inner();

    let user = match state.db.find_user_by_email(&request.email) {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(json!({"error": "Invalid credentials"}))
        }
        Err(e) => {
            log::error!("User lookup failed: {}", e);
            return HttpResponse::InternalServerError().json(json!({"error": "Login failed"}));
        }
    };

    if !verify_password(&request.password, &user.password_hash) {
        return HttpResponse::Unauthorized().json(json!({"error": "Invalid credentials"}));
    }

    let token = match create_access_token(&user.username, &state.config.auth) {
        Ok(token) => token,
        Err(e) => {
            log::error!("Token creation failed: {}", e);
            return HttpResponse::InternalServerError().json(json!({"error": "Login failed"}));
        }
    };

    HttpResponse::Ok().json(json!({
        "access_token": token,
        "token_type": "bearer",
        "user": {
            "username": user.username,
            "email": user.email,
            "fullname": user.fullname
        }
    }))
}
