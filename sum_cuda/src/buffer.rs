use cust::prelude::*;
use std::error::Error;

/// One side of the driver's ping-pong pair: device-resident integers that a
/// sweep either reads as its active prefix or fills with partial sums.
pub struct SumBuffer {
    dbuf: DeviceBuffer<i32>,
}

impl SumBuffer {
    /// Allocates device memory and copies the host values into it.
    pub fn new(values: &[i32]) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            dbuf: values.as_dbuf()?,
        })
    }

    /// Allocates a zero-filled device buffer for sweep output.
    pub fn zeroed(len: usize) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            dbuf: DeviceBuffer::zeroed(len)?,
        })
    }

    /// Device pointer for a kernel launch. The buffer is the kernel's to
    /// mutate until the caller synchronizes the stream.
    pub fn as_device_ptr(&self) -> DevicePointer<i32> {
        self.dbuf.as_device_ptr()
    }

    /// Copies the first element back to the host. Synchronizes the stream
    /// first, so the returned value reflects only completed launches.
    pub fn read_first(&self, stream: &Stream) -> Result<i32, Box<dyn Error>> {
        stream.synchronize()?;
        let mut value = [0i32];
        self.dbuf.index(0).copy_to(&mut value)?;
        Ok(value[0])
    }
}
