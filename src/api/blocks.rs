use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::error_response;
use super::models::{AddBlockRequest, AddBlockResponse, AppState, NodeResponse};
use crate::blockchain::MiningContext;
use crate::error::ChainError;
use crate::hash::Digest;

/// Mine a block on `parent` (or the best tip) and insert it into the graph.
///
/// The search runs on the blocking pool with the graph lock held, bounded
/// by the configured mining deadline.
#[post("/blocks/")]
pub async fn add_block(
    state: web::Data<AppState>,
    body: web::Json<AddBlockRequest>,
) -> impl Responder {
    let AddBlockRequest {
        parent,
        transactions,
    } = body.into_inner();
    debug!(
        "POST /blocks/ - parent={:?}, txs={}",
        parent.map(|p| p.short(12)),
        transactions.len()
    );

    let worker = state.clone();
    let result = web::block(move || {
        let mut ctx = MiningContext::unbounded();
        if let Some(timeout) = worker.settings.mine_timeout {
            ctx = ctx.with_timeout(timeout);
        }

        let mut graph = worker.graph.lock().expect("mutex poisoned");
        let parent = parent.unwrap_or_else(|| graph.best_tip());
        let hash = graph.add_child_with(&parent, transactions, &ctx)?;
        let resp = graph.node(&hash).map(|n| AddBlockResponse {
            hash,
            parent,
            index: n.block.header.index,
            nonce: n.block.header.nonce,
            work: n.work,
            cumulative_work: n.cumulative_work,
            best_tip: graph.best_tip(),
        });
        Ok::<_, ChainError>(resp)
    })
    .await;

    match result {
        Ok(Ok(Some(resp))) => {
            info!(
                "POST /blocks/ - sealed #{} {} (best tip {})",
                resp.index,
                resp.hash.short(12),
                resp.best_tip.short(12)
            );
            HttpResponse::Ok().json(resp)
        }
        Ok(Ok(None)) => HttpResponse::InternalServerError().body("inserted block not found"),
        Ok(Err(e)) => {
            warn!("POST /blocks/ - rejected: {e}");
            error_response(&e)
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// One node of the fork graph.
#[get("/blocks/{hash}/")]
pub async fn get_block(state: web::Data<AppState>, path: web::Path<(String,)>) -> impl Responder {
    let hash: Digest = match path.into_inner().0.parse() {
        Ok(d) => d,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let graph = state.graph.lock().expect("mutex poisoned");
    match graph.node(&hash) {
        Some(node) => HttpResponse::Ok().json(NodeResponse::new(hash, node)),
        None => HttpResponse::NotFound().body(format!("unknown block {hash}")),
    }
}
