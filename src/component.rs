//! Defines the Component trait shared by the scopetrace processing stages.
//! This enforces a common interface between stages, so that each stage can
//! consume data from the preceding stage, process it, and pass new data to
//! the subsequent stage in the conversion pipeline.

use log::{info, warn};
use std::fmt;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Errors raised by a component while converting or shutting down.
#[derive(Debug)]
pub enum ComponentError {
    /// The WAV writer failed while writing or finalizing the file.
    Hound(hound::Error),
    /// The component was used again after `finalize` consumed its sink.
    Finalized,
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ComponentError::Hound(error) => write!(f, "wav writer error: {error}"),
            ComponentError::Finalized => write!(f, "component used after finalize"),
        }
    }
}

impl std::error::Error for ComponentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComponentError::Hound(error) => Some(error),
            ComponentError::Finalized => None,
        }
    }
}

impl From<hound::Error> for ComponentError {
    fn from(error: hound::Error) -> Self {
        ComponentError::Hound(error)
    }
}

/// A stage in the conversion pipeline. All structs that perform a processing
/// step in the scopetrace system implement Component, so that they can be
/// run on their own thread between a pair of channels.
pub trait Component: fmt::Display {
    /// What the stage consumes.
    type InData;
    /// What the stage produces.
    type OutData;

    /// Converts one input item into one output item.
    fn convert(&mut self, input: Self::InData) -> Self::OutData;

    /// Cleans up at termination of the pipeline.
    fn finalize(&mut self) -> Result<(), ComponentError>;
}

/// Runs the given Component on its own thread. On receiving data of type
/// InData on the input channel, the Component converts it to data of type
/// OutData and sends it to the output channel. The thread ends when the
/// input channel's senders are all dropped.
pub fn run_component<C: Component + Send + 'static>(
    mut component: Box<C>,
    input: Receiver<C::InData>,
    output: Sender<C::OutData>,
) -> JoinHandle<()>
where
    C::InData: Send + 'static,
    C::OutData: Send + 'static,
{
    thread::spawn(move || {
        while let Ok(data) = input.recv() {
            let out_data = component.convert(data);
            if output.send(out_data).is_err() {
                warn!("{component} : output channel closed, stopping.");
                break;
            }
        }

        if let Err(component_error) = component.finalize() {
            warn!("{component} : error during termination : {component_error}.");
        }
        info!("{component} : terminated.");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    /// Null MockComponent for compilation testing
    struct MockComponent {}

    impl Component for MockComponent {
        type InData = i32;
        type OutData = i32;

        fn convert(&mut self, input: i32) -> i32 {
            input + 1
        }

        fn finalize(&mut self) -> Result<(), ComponentError> {
            Ok(())
        }
    }

    impl fmt::Display for MockComponent {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "MockComponent")
        }
    }

    /// Checks that a Component's generic input and output types can be
    /// specified. Checks that writing a value to the Component's input
    /// produces that value, converted, in the Component's output
    #[test]
    fn test_mock_component() {
        let (test_tx, block_rx) = channel::<i32>();
        let (block_tx, test_rx) = channel::<i32>();

        run_component(Box::new(MockComponent {}), block_rx, block_tx);

        assert_eq!(test_tx.send(0), Ok(()));
        assert_eq!(test_rx.recv(), Ok(1));
    }

    #[test]
    fn test_chained_component() {
        let (test_tx, block_a_rx) = channel::<i32>();
        let (block_a_tx, block_b_rx) = channel::<i32>();
        let (block_b_tx, test_rx) = channel::<i32>();

        run_component(Box::new(MockComponent {}), block_a_rx, block_a_tx);
        run_component(Box::new(MockComponent {}), block_b_rx, block_b_tx);

        assert_eq!(test_tx.send(0), Ok(()));
        assert_eq!(test_rx.recv(), Ok(2));
    }

    #[test]
    fn worker_drains_in_fifo_order() {
        let (test_tx, block_rx) = channel::<i32>();
        let (block_tx, test_rx) = channel::<i32>();

        run_component(Box::new(MockComponent {}), block_rx, block_tx);

        for value in 0..16 {
            test_tx.send(value).unwrap();
        }
        drop(test_tx);

        let received: Vec<i32> = test_rx.iter().collect();
        assert_eq!(received, (1..17).collect::<Vec<i32>>());
    }
}
