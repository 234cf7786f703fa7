use serde::Serialize;
use serde::de::DeserializeOwned;

/// A named request type dispatched through a [`RequisitionBus`](crate::RequisitionBus).
///
/// Implementors are zero-sized marker types, usually declared with
/// [`define_requisitions!`](crate::define_requisitions). The payload type ties
/// every subscriber of a key to one argument shape, and the serde bounds let
/// the same payload cross the host boundary as JSON.
pub trait Requisition: 'static {
	/// Wire name of the requisition.
	const NAME: &'static str;

	/// Value handed to every subscriber.
	type Payload: Clone + Send + Serialize + DeserializeOwned + 'static;
}
