/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth (token gate), cors, http (request id / trace / limits)
 */
pub mod auth;
pub mod cors;
pub mod http;
