use actix_web::{HttpResponse, Responder, get, web};

use super::error_response;
use super::models::{
    AppState, ChainResponse, PathResponse, TipInfo, TipsResponse, ValidateResponse,
};
use crate::blockchain::check_chain;
use crate::hash::Digest;

/// Best chain from genesis to the current best tip.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let graph = state.graph.lock().expect("mutex poisoned");
    let chain = match graph.best_chain() {
        Ok(c) => c,
        Err(e) => return error_response(&e),
    };
    let blocks = match graph.best_blocks() {
        Ok(b) => b,
        Err(e) => return error_response(&e),
    };
    let cumulative_work = graph.best_node().map(|n| n.cumulative_work).unwrap_or(0);

    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        difficulty: graph.difficulty(),
        best_tip: graph.best_tip(),
        cumulative_work,
        chain,
        blocks,
    })
}

/// Validate the best chain end to end.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let graph = state.graph.lock().expect("mutex poisoned");
    let blocks = match graph.best_blocks() {
        Ok(b) => b,
        Err(e) => return error_response(&e),
    };
    let result = check_chain(&blocks);
    HttpResponse::Ok().json(ValidateResponse {
        valid: result.is_ok(),
        length: blocks.len(),
        difficulty: graph.difficulty(),
        error: result.err().map(|e| e.to_string()),
    })
}

/// Path from genesis to any known block.
#[get("/path/{hash}/")]
pub async fn get_path(state: web::Data<AppState>, path: web::Path<(String,)>) -> impl Responder {
    let tip: Digest = match path.into_inner().0.parse() {
        Ok(d) => d,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let graph = state.graph.lock().expect("mutex poisoned");
    match graph.path_to_genesis(&tip) {
        Ok(path) => HttpResponse::Ok().json(PathResponse { tip, path }),
        Err(e) => error_response(&e),
    }
}

/// Every branch end, with its cumulative work.
#[get("/tips/")]
pub async fn get_tips(state: web::Data<AppState>) -> impl Responder {
    let graph = state.graph.lock().expect("mutex poisoned");
    let best = graph.best_tip();
    let tips = graph
        .tips()
        .into_iter()
        .filter_map(|hash| {
            graph.node(&hash).map(|n| TipInfo {
                hash,
                index: n.block.header.index,
                cumulative_work: n.cumulative_work,
                best: hash == best,
            })
        })
        .collect();
    HttpResponse::Ok().json(TipsResponse { tips })
}
