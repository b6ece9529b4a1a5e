//! Failures of the order lifecycle service.

use order_storage::StorageError;
use order_types::{APIError, OrderId, OrderStatus};
use thiserror::Error;

pub const CUSTOMER_NAME_REQUIRED: &str = "Nome do cliente é obrigatório";
pub const CUSTOMER_NAME_TOO_LONG: &str = "Nome do cliente deve ter no máximo 100 caracteres";
pub const TOTAL_AMOUNT_NOT_POSITIVE: &str = "Valor total deve ser maior que zero";
pub const INVALID_ORDER_ID: &str = "ID do pedido é inválido";

/// Message returned to callers for any failure they cannot act on.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

/// Errors produced by [`super::OrderService`].
///
/// The display text of the expected variants is the user-facing message.
#[derive(Debug, Error)]
pub enum OrderServiceError {
	#[error("{0}")]
	InvalidInput(String),
	#[error("Pedido com ID {0} não foi encontrado")]
	NotFound(OrderId),
	#[error(
		"Não é possível alterar o status de '{}' para '{}'. Consulte as regras de transição de status.",
		.from.label(),
		.to.label()
	)]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	#[error("Não é possível excluir um pedido com status '{}'.", .0.label())]
	CannotDelete(OrderStatus),
	#[error("Storage error: {0}")]
	Storage(String),
	#[error("Unexpected error: {0}")]
	Unexpected(String),
}

/// Classification of [`OrderServiceError`] used at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	InvalidInput,
	NotFound,
	InvalidTransition,
	Unexpected,
}

impl OrderServiceError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			OrderServiceError::InvalidInput(_) => ErrorKind::InvalidInput,
			OrderServiceError::NotFound(_) => ErrorKind::NotFound,
			OrderServiceError::InvalidTransition { .. } | OrderServiceError::CannotDelete(_) => {
				ErrorKind::InvalidTransition
			},
			OrderServiceError::Storage(_) | OrderServiceError::Unexpected(_) => {
				ErrorKind::Unexpected
			},
		}
	}

	/// Whether this is an ordinary outcome of bad input rather than a defect.
	pub fn is_expected(&self) -> bool {
		self.kind() != ErrorKind::Unexpected
	}

	/// Message safe to show to the caller.
	pub fn user_message(&self) -> String {
		if self.is_expected() {
			self.to_string()
		} else {
			INTERNAL_ERROR_MESSAGE.to_string()
		}
	}

	pub(crate) fn invalid_input(message: &str) -> Self {
		OrderServiceError::InvalidInput(message.to_string())
	}
}

impl From<StorageError> for OrderServiceError {
	fn from(err: StorageError) -> Self {
		OrderServiceError::Storage(err.to_string())
	}
}

impl From<OrderServiceError> for APIError {
	fn from(err: OrderServiceError) -> Self {
		let message = err.user_message();
		match err.kind() {
			ErrorKind::InvalidInput | ErrorKind::InvalidTransition => {
				APIError::BadRequest { message }
			},
			ErrorKind::NotFound => APIError::NotFound { message },
			ErrorKind::Unexpected => APIError::InternalServerError { message },
		}
	}
}
