use cuda_builder::CudaBuilder;

fn main() {
    CudaBuilder::new("../sum_gpu")
        .copy_to("../resources/sum_gpu.ptx")
        .build()
        .unwrap();
}
