/// Declares requisition marker types.
///
/// ```ignore
/// define_requisitions! {
///     /// Ask the host to open a file.
///     OpenFile => "openFile" (String),
/// }
/// ```
///
/// Each entry expands to a unit struct implementing
/// [`Requisition`](crate::Requisition) with the given wire name and payload.
#[macro_export]
macro_rules! define_requisitions {
	($($(#[$meta:meta])* $name:ident => $wire:literal ($payload:ty)),* $(,)?) => {
		$(
			$(#[$meta])*
			#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
			pub struct $name;

			impl $crate::Requisition for $name {
				const NAME: &'static str = $wire;
				type Payload = $payload;
			}
		)*
	};
}
