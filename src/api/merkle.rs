use actix_web::{HttpResponse, Responder, post, web};

use super::error_response;
use super::models::{
    MerkleProofRequest, MerkleProofResponse, MerkleRootRequest, MerkleRootResponse,
    VerifyProofRequest, VerifyProofResponse,
};
use crate::merkle::{merkle_proof, merkle_root, verify_proof};

/// Merkle root of an arbitrary transaction list.
#[post("/merkle/root/")]
pub async fn post_root(body: web::Json<MerkleRootRequest>) -> impl Responder {
    HttpResponse::Ok().json(MerkleRootResponse {
        root: merkle_root(&body.transactions),
        leaves: body.transactions.len(),
    })
}

/// Inclusion proof for one transaction of the list.
#[post("/merkle/proof/")]
pub async fn post_proof(body: web::Json<MerkleProofRequest>) -> impl Responder {
    match merkle_proof(&body.transactions, body.index) {
        Ok(proof) => HttpResponse::Ok().json(MerkleProofResponse {
            root: merkle_root(&body.transactions),
            index: body.index,
            proof,
        }),
        Err(e) => error_response(&e),
    }
}

/// Check a transaction against a proof and root. Always 200; the verdict
/// is in the body.
#[post("/merkle/verify/")]
pub async fn post_verify(body: web::Json<VerifyProofRequest>) -> impl Responder {
    HttpResponse::Ok().json(VerifyProofResponse {
        valid: verify_proof(&body.transaction, &body.proof, &body.root),
    })
}
